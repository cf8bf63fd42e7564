//! Assembly of definition records from segmented units.

use crate::associate::ImageIndex;
use crate::model::{Classification, DefinitionRecord, ImageList};
use crate::parser::DefinitionUnit;

/// Builds [`DefinitionRecord`]s, pulling image associations from an index.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordBuilder<'a> {
    classification: Classification,
    images: Option<&'a ImageIndex>,
}

impl<'a> RecordBuilder<'a> {
    /// Create a builder with the default classification and no images.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the classification given to records.
    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = classification;
        self
    }

    /// Link images from an index.
    pub fn with_images(mut self, images: &'a ImageIndex) -> Self {
        self.images = Some(images);
        self
    }

    /// Build one record.
    pub fn build(&self, unit: DefinitionUnit) -> DefinitionRecord {
        let images = self
            .images
            .map(|index| index.link(&unit.term_id))
            .unwrap_or_else(ImageList::new);

        DefinitionRecord::new(unit.term_id, unit.term, unit.text)
            .with_classification(self.classification)
            .with_images(images)
    }

    /// Build records for every unit, preserving order.
    pub fn build_all<I>(&self, units: I) -> Vec<DefinitionRecord>
    where
        I: IntoIterator<Item = DefinitionUnit>,
    {
        units.into_iter().map(|unit| self.build(unit)).collect()
    }
}
