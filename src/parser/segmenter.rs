//! Definition segmentation.
//!
//! Scans an element stream left to right. A text element matching the
//! definition-start pattern opens a unit; following text elements are
//! absorbed as continuation lines until a non-text element, another
//! definition start, or the end of the stream. Scanning resumes at the
//! element that stopped collection, so every element is examined once as a
//! potential start and consumed at most once.

use crate::associate::ImageIndex;
use crate::model::{DefinitionRecord, RawElement};
use crate::render::RecordBuilder;

use super::cleanup::TextCleanup;
use super::options::ParseOptions;
use super::pattern::DefinitionMatcher;
use super::slug::{normalize, strip_emphasis};

/// One definition as found in the stream, before record assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionUnit {
    /// Display term, emphasis markers removed
    pub term: String,

    /// Identifier derived from the term
    pub term_id: String,

    /// Body with continuation lines, trimmed
    pub text: String,

    /// Index of the defining element
    pub start: usize,

    /// Index one past the last absorbed element
    pub end: usize,
}

impl DefinitionUnit {
    /// Number of continuation elements absorbed after the defining one.
    pub fn continuation_count(&self) -> usize {
        self.end - self.start - 1
    }
}

/// Splits element streams into definition units.
#[derive(Debug, Clone)]
pub struct Segmenter {
    matcher: DefinitionMatcher,
    cleanup: TextCleanup,
    options: ParseOptions,
}

impl Segmenter {
    /// Create a segmenter with default options.
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    /// Create a segmenter with options.
    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            matcher: DefinitionMatcher::new(),
            cleanup: TextCleanup::new(options.cleanup),
            options,
        }
    }

    /// Get the options.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Iterate over the definition units of a stream.
    pub fn units<'s, 'e>(&'s self, elements: &'e [RawElement]) -> Definitions<'s, 'e> {
        Definitions {
            segmenter: self,
            elements,
            pos: 0,
        }
    }

    /// Segment a stream into records without image associations.
    pub fn segment(&self, elements: &[RawElement]) -> Vec<DefinitionRecord> {
        RecordBuilder::new()
            .with_classification(self.options.classification)
            .build_all(self.units(elements))
    }

    /// Segment a stream into records, linking images from an index.
    pub fn segment_with_images(
        &self,
        elements: &[RawElement],
        images: &ImageIndex,
    ) -> Vec<DefinitionRecord> {
        RecordBuilder::new()
            .with_classification(self.options.classification)
            .with_images(images)
            .build_all(self.units(elements))
    }

    fn collect_unit(&self, elements: &[RawElement], i: usize) -> Option<DefinitionUnit> {
        let content = self.text_at(elements, i)?;
        let start = self.matcher.match_start(&content)?;

        let term = strip_emphasis(start.term).trim().to_string();
        let term_id = normalize(start.term);
        let mut text = start.body.to_string();

        let mut j = i + 1;
        while let Some(next) = self.text_at(elements, j) {
            if self.matcher.is_start(&next) {
                break;
            }
            text.push('\n');
            text.push_str(&next);
            j += 1;
        }

        log::trace!(
            "Definition '{}' spans elements {}..{}",
            term_id,
            i,
            j
        );

        Some(DefinitionUnit {
            term,
            term_id,
            text: text.trim().to_string(),
            start: i,
            end: j,
        })
    }

    fn text_at<'e>(
        &self,
        elements: &'e [RawElement],
        index: usize,
    ) -> Option<std::borrow::Cow<'e, str>> {
        match elements.get(index)? {
            RawElement::Text { content, .. } => Some(self.cleanup.apply(content)),
            RawElement::TableRow { .. } | RawElement::Image { .. } => None,
        }
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the definition units of a stream.
pub struct Definitions<'s, 'e> {
    segmenter: &'s Segmenter,
    elements: &'e [RawElement],
    pos: usize,
}

impl Iterator for Definitions<'_, '_> {
    type Item = DefinitionUnit;

    fn next(&mut self) -> Option<DefinitionUnit> {
        while self.pos < self.elements.len() {
            match self.segmenter.collect_unit(self.elements, self.pos) {
                Some(unit) => {
                    self.pos = unit.end;
                    return Some(unit);
                }
                None => self.pos += 1,
            }
        }
        None
    }
}
