//! Definition records produced by the segmenter.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Separator used when image filenames are joined into one field.
pub const IMAGE_SEPARATOR: char = ';';

/// A reconstructed "term means definition" record.
///
/// Field order matches the serialized output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionRecord {
    /// Canonical identifier derived from the term
    #[serde(rename = "termID")]
    pub term_id: String,

    /// Display term with emphasis markers removed
    #[serde(rename = "terms")]
    pub term: String,

    /// Definition body, continuation lines joined by `\n`
    pub text: String,

    /// Definition classification
    #[serde(rename = "type", default)]
    pub classification: Classification,

    /// Associated image filenames
    #[serde(rename = "image", default)]
    pub images: ImageList,
}

impl DefinitionRecord {
    /// Create a record with the default classification and no images.
    pub fn new(
        term_id: impl Into<String>,
        term: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            term_id: term_id.into(),
            term: term.into(),
            text: text.into(),
            classification: Classification::default(),
            images: ImageList::new(),
        }
    }

    /// Set the classification.
    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = classification;
        self
    }

    /// Set the associated images.
    pub fn with_images(mut self, images: ImageList) -> Self {
        self.images = images;
        self
    }

    /// Number of lines in the definition body.
    pub fn line_count(&self) -> usize {
        if self.text.is_empty() {
            0
        } else {
            self.text.lines().count()
        }
    }

    /// Check if any images are associated.
    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }
}

/// Classification of a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Classification {
    /// General definition
    #[default]
    General,
    /// Use definition
    Use,
    /// Both general and use
    GeneralUse,
}

impl Classification {
    /// The serialized label.
    pub fn label(&self) -> &'static str {
        match self {
            Classification::General => "General",
            Classification::Use => "Use",
            Classification::GeneralUse => "General / Use",
        }
    }

    /// Normalize a free-form label.
    ///
    /// Exact labels map directly. Otherwise a label mentioning both "use"
    /// and "general" is [`Classification::GeneralUse`], one mentioning
    /// "use" is [`Classification::Use`], and anything else is
    /// [`Classification::General`].
    pub fn from_label(raw: &str) -> Self {
        let val = raw.trim();
        match val {
            "General" => return Classification::General,
            "Use" => return Classification::Use,
            "General / Use" => return Classification::GeneralUse,
            _ => {}
        }

        let lower = val.to_lowercase();
        let has_use = lower.contains("use");
        if has_use && lower.contains("general") {
            Classification::GeneralUse
        } else if has_use {
            Classification::Use
        } else {
            Classification::General
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Classification {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Classification {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Classification::from_label(&raw))
    }
}

/// Ordered set of image filenames.
///
/// Serialized as a single `;`-joined string, empty when there are no images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageList(Vec<String>);

impl ImageList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a filename, ignoring duplicates.
    pub fn insert(&mut self, filename: impl Into<String>) -> bool {
        let filename = filename.into();
        if self.0.contains(&filename) {
            return false;
        }
        self.0.push(filename);
        true
    }

    /// Number of filenames.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over filenames in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Join filenames with [`IMAGE_SEPARATOR`].
    pub fn joined(&self) -> String {
        self.0.join(&IMAGE_SEPARATOR.to_string())
    }

    /// Parse a joined field back into a list.
    pub fn parse(joined: &str) -> Self {
        joined
            .split(IMAGE_SEPARATOR)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ImageList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = ImageList::new();
        for item in iter {
            list.insert(item);
        }
        list
    }
}

impl Serialize for ImageList {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.joined())
    }
}

impl<'de> Deserialize<'de> for ImageList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ImageList::parse(&raw))
    }
}
