//! Page layout consumed by the positional image associator.
//!
//! The layout is written by the external image-extraction step: for every
//! page it lists the text blocks with their vertical position and the
//! extracted images with theirs. Positions grow downwards (a smaller `top`
//! is higher on the page).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Page-by-page layout of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Pages in document order
    pub pages: Vec<LayoutPage>,
}

impl PageLayout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page.
    pub fn add_page(&mut self, page: LayoutPage) {
        self.pages.push(page);
    }

    /// Parse a layout from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let layout: PageLayout = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Read a layout from a JSON file.
    ///
    /// Relative image sources are resolved against the file's directory.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let mut layout = Self::from_json(&json)?;
        if let Some(base) = path.parent() {
            layout.resolve_sources(base);
        }
        Ok(layout)
    }

    /// Join relative image sources onto `base`.
    pub fn resolve_sources(&mut self, base: &Path) {
        for image in self.pages.iter_mut().flat_map(|p| p.images.iter_mut()) {
            if image.source.is_relative() {
                image.source = base.join(&image.source);
            }
        }
    }

    /// Check that pages are numbered from 1 and in document order.
    pub fn validate(&self) -> Result<()> {
        let mut previous = 0u32;
        for page in &self.pages {
            if page.number <= previous {
                return Err(Error::Layout(format!(
                    "page {} listed after page {}",
                    page.number, previous
                )));
            }
            previous = page.number;
        }
        Ok(())
    }

    /// Total number of image occurrences.
    pub fn image_count(&self) -> usize {
        self.pages.iter().map(|p| p.images.len()).sum()
    }
}

/// Text blocks and images of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPage {
    /// Page number (1-indexed)
    pub number: u32,

    /// Text blocks in reading order
    #[serde(default)]
    pub blocks: Vec<LayoutBlock>,

    /// Image occurrences in extraction order
    #[serde(default)]
    pub images: Vec<ImageOccurrence>,
}

impl LayoutPage {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            blocks: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Add a text block.
    pub fn with_block(mut self, text: impl Into<String>, top: f64) -> Self {
        self.blocks.push(LayoutBlock {
            text: text.into(),
            top,
        });
        self
    }

    /// Add an image occurrence.
    pub fn with_image(mut self, image: ImageOccurrence) -> Self {
        self.images.push(image);
        self
    }
}

/// A text block with its vertical position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutBlock {
    /// Block text
    pub text: String,

    /// Top edge of the block
    pub top: f64,
}

/// An image extracted from a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageOccurrence {
    /// Path of the extracted image bytes
    pub source: PathBuf,

    /// Top edge of the image; `None` when the image is not placed on the page
    #[serde(default)]
    pub top: Option<f64>,

    /// File extension reported by the extractor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,
}

impl ImageOccurrence {
    /// Create a placed image occurrence.
    pub fn new(source: impl Into<PathBuf>, top: f64) -> Self {
        Self {
            source: source.into(),
            top: Some(top),
            ext: None,
        }
    }

    /// Create an occurrence with no placement on the page.
    pub fn unplaced(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            top: None,
            ext: None,
        }
    }

    /// Set the file extension.
    pub fn with_ext(mut self, ext: impl Into<String>) -> Self {
        self.ext = Some(ext.into());
        self
    }
}
