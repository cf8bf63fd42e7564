//! Positional image-to-term association.
//!
//! Runs before segmentation, without knowledge of final record boundaries.
//! Each image is assigned to the last definition-start block above it on
//! its page; when there is none, the term carries over from the previous
//! image. The running term and per-term counters live in an explicit
//! [`AssociationState`] folded over the pages of one document.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::image::{detect_extension, image_filename, path_extension};
use crate::model::{ImageOccurrence, LayoutPage, PageLayout};
use crate::parser::{normalize, DefinitionMatcher};

/// Term used for images seen before any definition.
pub const FALLBACK_TERM: &str = "General_Image";

/// Extension used when none can be determined.
const DEFAULT_EXTENSION: &str = "png";

/// An image and the name it receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAssignment {
    /// Page the image was found on
    pub page: u32,

    /// Path of the extracted image bytes
    pub source: PathBuf,

    /// Slug of the term the image was assigned to
    pub term: String,

    /// Per-term sequence number, starting at 1
    pub sequence: u32,

    /// Final filename, `<term>_img<sequence>.<ext>`
    pub filename: String,
}

/// Running state of one association pass.
#[derive(Debug, Clone)]
pub struct AssociationState {
    current_term: String,
    counters: HashMap<String, u32>,
}

impl AssociationState {
    /// Create the initial state.
    pub fn new() -> Self {
        Self {
            current_term: FALLBACK_TERM.to_string(),
            counters: HashMap::new(),
        }
    }

    /// The term the next unanchored image will be assigned to.
    pub fn current_term(&self) -> &str {
        &self.current_term
    }

    /// Move to a term and return its next sequence number.
    fn advance(&mut self, term: String) -> u32 {
        let count = self.counters.entry(term.clone()).or_insert(0);
        *count += 1;
        let sequence = *count;
        self.current_term = term;
        sequence
    }
}

impl Default for AssociationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Assigns images to terms by vertical position.
#[derive(Debug, Clone, Default)]
pub struct PositionalAssociator {
    matcher: DefinitionMatcher,
}

impl PositionalAssociator {
    /// Create a new associator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign every placed image in the layout to a term.
    pub fn assign(&self, layout: &PageLayout) -> Vec<ImageAssignment> {
        let (_, assignments) = layout.pages.iter().fold(
            (AssociationState::new(), Vec::new()),
            |(state, mut assignments), page| {
                let state = self.assign_page(state, page, &mut assignments);
                (state, assignments)
            },
        );
        log::debug!(
            "Assigned {} of {} images",
            assignments.len(),
            layout.image_count()
        );
        assignments
    }

    /// Assign the images of one page, threading the running state through.
    pub fn assign_page(
        &self,
        mut state: AssociationState,
        page: &LayoutPage,
        out: &mut Vec<ImageAssignment>,
    ) -> AssociationState {
        for image in &page.images {
            let Some(image_top) = image.top else {
                log::debug!(
                    "Page {}: skipping unplaced image {}",
                    page.number,
                    image.source.display()
                );
                continue;
            };

            let term = self
                .term_above(page, image_top)
                .unwrap_or_else(|| state.current_term().to_string());
            let sequence = state.advance(term.clone());
            let filename = image_filename(&term, sequence, &resolve_extension(image));

            out.push(ImageAssignment {
                page: page.number,
                source: image.source.clone(),
                term,
                sequence,
                filename,
            });
        }
        state
    }

    /// Slug of the last definition-start block above `top`, in block order.
    fn term_above(&self, page: &LayoutPage, top: f64) -> Option<String> {
        page.blocks
            .iter()
            .filter(|block| block.top < top)
            .filter_map(|block| self.matcher.match_start(block.text.trim()))
            .last()
            .map(|start| normalize(start.term))
    }
}

/// Copy assigned images into the image directory under their new names.
///
/// Returns the paths written.
pub fn place_images<P: AsRef<Path>>(
    assignments: &[ImageAssignment],
    dest_dir: P,
) -> Result<Vec<PathBuf>> {
    let dest_dir = dest_dir.as_ref();
    fs::create_dir_all(dest_dir)?;

    let mut written = Vec::with_capacity(assignments.len());
    for assignment in assignments {
        if assignment.source.file_name().is_none() {
            return Err(Error::Layout(format!(
                "image source '{}' is not a file",
                assignment.source.display()
            )));
        }
        let target = dest_dir.join(&assignment.filename);
        fs::copy(&assignment.source, &target)?;
        log::debug!("Saved {}", assignment.filename);
        written.push(target);
    }
    Ok(written)
}

/// Pick the extension for an image: layout, then source name, then bytes.
fn resolve_extension(image: &ImageOccurrence) -> String {
    if let Some(ext) = image.ext.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        return ext.trim_start_matches('.').to_lowercase();
    }
    if let Some(ext) = path_extension(&image.source) {
        return ext;
    }
    fs::read(&image.source)
        .ok()
        .and_then(|data| detect_extension(&data))
        .unwrap_or(DEFAULT_EXTENSION)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str, top: f64) -> ImageOccurrence {
        ImageOccurrence::new(name, top).with_ext("png")
    }

    fn names(assignments: &[ImageAssignment]) -> Vec<&str> {
        assignments.iter().map(|a| a.filename.as_str()).collect()
    }

    #[test]
    fn test_image_before_any_definition_uses_fallback() {
        let mut layout = PageLayout::new();
        layout.add_page(
            LayoutPage::new(1)
                .with_block("Title page", 10.0)
                .with_image(image("a", 50.0)),
        );
        let assignments = PositionalAssociator::new().assign(&layout);
        assert_eq!(names(&assignments), vec!["General_Image_img1.png"]);
    }

    #[test]
    fn test_last_matching_block_above_wins() {
        let mut layout = PageLayout::new();
        layout.add_page(
            LayoutPage::new(1)
                .with_block("**Deck** means a platform", 100.0)
                .with_block("(a) attached", 120.0)
                .with_block("**Banner Sign** means a sign", 200.0)
                .with_block("Yard means open space", 400.0)
                .with_image(image("a", 300.0)),
        );
        let assignments = PositionalAssociator::new().assign(&layout);
        assert_eq!(names(&assignments), vec!["Banner_Sign_img1.png"]);
        assert_eq!(assignments[0].term, "Banner_Sign");
    }

    #[test]
    fn test_tie_break_follows_block_order_not_position() {
        let mut layout = PageLayout::new();
        layout.add_page(
            LayoutPage::new(1)
                .with_block("Lower means below", 250.0)
                .with_block("Upper means above", 100.0)
                .with_image(image("a", 300.0)),
        );
        let assignments = PositionalAssociator::new().assign(&layout);
        assert_eq!(assignments[0].term, "Upper");
    }

    #[test]
    fn test_block_at_same_height_is_not_above() {
        let mut layout = PageLayout::new();
        layout.add_page(
            LayoutPage::new(1)
                .with_block("Deck means a platform", 100.0)
                .with_image(image("a", 100.0)),
        );
        let assignments = PositionalAssociator::new().assign(&layout);
        assert_eq!(assignments[0].term, FALLBACK_TERM);
    }

    #[test]
    fn test_term_carries_over_pages_and_counters_increase() {
        let mut layout = PageLayout::new();
        layout.add_page(
            LayoutPage::new(1)
                .with_block("Deck means a platform", 100.0)
                .with_image(image("a", 150.0))
                .with_image(image("b", 300.0)),
        );
        layout.add_page(
            LayoutPage::new(2)
                .with_block("continued text", 50.0)
                .with_image(image("c", 100.0))
                .with_block("Lot means a parcel", 200.0)
                .with_image(image("d", 250.0)),
        );
        layout.add_page(LayoutPage::new(3).with_image(image("e", 10.0)));

        let assignments = PositionalAssociator::new().assign(&layout);
        assert_eq!(
            names(&assignments),
            vec![
                "Deck_img1.png",
                "Deck_img2.png",
                "Deck_img3.png",
                "Lot_img1.png",
                "Lot_img2.png",
            ]
        );
        assert_eq!(assignments[4].page, 3);
    }

    #[test]
    fn test_image_above_definition_keeps_previous_term() {
        let mut layout = PageLayout::new();
        layout.add_page(
            LayoutPage::new(1)
                .with_block("Deck means a platform", 100.0)
                .with_image(image("a", 150.0)),
        );
        layout.add_page(
            LayoutPage::new(2)
                .with_block("Lot means a parcel", 500.0)
                .with_image(image("b", 100.0)),
        );
        let assignments = PositionalAssociator::new().assign(&layout);
        assert_eq!(names(&assignments), vec!["Deck_img1.png", "Deck_img2.png"]);
    }

    #[test]
    fn test_unplaced_image_is_skipped_without_consuming_counter() {
        let mut layout = PageLayout::new();
        layout.add_page(
            LayoutPage::new(1)
                .with_block("Deck means a platform", 100.0)
                .with_image(ImageOccurrence::unplaced("lost.png"))
                .with_image(image("a", 150.0)),
        );
        let assignments = PositionalAssociator::new().assign(&layout);
        assert_eq!(names(&assignments), vec!["Deck_img1.png"]);
    }

    #[test]
    fn test_extension_resolution() {
        let with_ext = ImageOccurrence::new("raw/x.bin", 1.0).with_ext(".JPEG");
        assert_eq!(resolve_extension(&with_ext), "jpeg");

        let from_name = ImageOccurrence::new("raw/x.gif", 1.0);
        assert_eq!(resolve_extension(&from_name), "gif");

        let missing = ImageOccurrence::new("raw/does-not-exist", 1.0);
        assert_eq!(resolve_extension(&missing), DEFAULT_EXTENSION);

        let dir = tempfile::tempdir().unwrap();
        let sniffed = dir.path().join("p2_x3");
        fs::write(&sniffed, b"\xFF\xD8\xFF\xE0rest").unwrap();
        assert_eq!(resolve_extension(&ImageOccurrence::new(&sniffed, 1.0)), "jpeg");
    }

    #[test]
    fn test_place_images_copies_under_new_names() {
        let src_dir = tempfile::tempdir().unwrap();
        let dest_dir = tempfile::tempdir().unwrap();
        let source = src_dir.path().join("p1_x7.png");
        fs::write(&source, b"\x89PNG\r\n\x1a\nrest").unwrap();

        let mut layout = PageLayout::new();
        layout.add_page(
            LayoutPage::new(1)
                .with_block("Deck means a platform", 10.0)
                .with_image(ImageOccurrence::new(&source, 20.0)),
        );
        let assignments = PositionalAssociator::new().assign(&layout);
        let written = place_images(&assignments, dest_dir.path().join("images")).unwrap();

        assert_eq!(written.len(), 1);
        assert!(dest_dir.path().join("images/Deck_img1.png").exists());
    }
}
