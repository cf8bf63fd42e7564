//! Raw element types produced by the document extraction step.

use serde::{Deserialize, Serialize};

/// Page coordinates of a text block, as reported by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    #[serde(rename = "l")]
    pub left: f64,

    /// Top edge
    #[serde(rename = "t")]
    pub top: f64,

    /// Right edge
    #[serde(rename = "r")]
    pub right: f64,

    /// Bottom edge
    #[serde(rename = "b")]
    pub bottom: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width of the box.
    pub fn width(&self) -> f64 {
        (self.right - self.left).abs()
    }

    /// Height of the box.
    pub fn height(&self) -> f64 {
        (self.top - self.bottom).abs()
    }
}

/// One element of an extracted document, in reading order.
///
/// Text content is markdown-flavored: emphasis markers such as `**` are
/// kept as literal characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawElement {
    /// A paragraph or line of text
    Text {
        /// Text content with emphasis markers intact
        content: String,
        /// Position on the page, if the extractor reported one
        #[serde(default, skip_serializing_if = "Option::is_none")]
        coords: Option<BoundingBox>,
    },

    /// A single table row
    TableRow {
        /// Cell contents in column order
        cells: Vec<String>,
    },

    /// An image reference
    Image {
        /// Filename of the extracted image
        image_path: String,
    },
}

impl RawElement {
    /// Create a text element without coordinates.
    pub fn text(content: impl Into<String>) -> Self {
        RawElement::Text {
            content: content.into(),
            coords: None,
        }
    }

    /// Create a text element with coordinates.
    pub fn text_at(content: impl Into<String>, coords: BoundingBox) -> Self {
        RawElement::Text {
            content: content.into(),
            coords: Some(coords),
        }
    }

    /// Create a table row element.
    pub fn table_row<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RawElement::TableRow {
            cells: cells.into_iter().map(Into::into).collect(),
        }
    }

    /// Create an image element.
    pub fn image(image_path: impl Into<String>) -> Self {
        RawElement::Image {
            image_path: image_path.into(),
        }
    }

    /// Get the element kind.
    pub fn kind(&self) -> ElementKind {
        match self {
            RawElement::Text { .. } => ElementKind::Text,
            RawElement::TableRow { .. } => ElementKind::TableRow,
            RawElement::Image { .. } => ElementKind::Image,
        }
    }

    /// Get the text content if this is a text element.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawElement::Text { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Check if this is a text element.
    pub fn is_text(&self) -> bool {
        matches!(self, RawElement::Text { .. })
    }
}

/// Discriminant of a [`RawElement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Text element
    Text,
    /// Table row element
    TableRow,
    /// Image element
    Image,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementKind::Text => write!(f, "text"),
            ElementKind::TableRow => write!(f, "table_row"),
            ElementKind::Image => write!(f, "image"),
        }
    }
}
