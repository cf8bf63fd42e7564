//! Conversion statistics.

use serde::{Deserialize, Serialize};

use crate::model::{DefinitionRecord, ElementKind, ElementStream};
use crate::parser::DefinitionUnit;

/// Statistics collected while converting one or more documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentStats {
    /// Number of documents processed
    pub document_count: u32,

    /// Total number of elements read
    pub element_count: u32,

    /// Number of text elements
    pub text_count: u32,

    /// Number of table row elements
    pub table_row_count: u32,

    /// Number of image elements
    pub image_count: u32,

    /// Number of definitions found
    pub definition_count: u32,

    /// Number of continuation lines absorbed into definitions
    pub continuation_count: u32,

    /// Number of records with at least one linked image
    pub linked_record_count: u32,

    /// Number of image filenames linked to records
    pub linked_image_count: u32,
}

impl SegmentStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the elements of a stream.
    pub fn count_stream(&mut self, stream: &ElementStream) {
        self.document_count += 1;
        for element in stream {
            self.element_count += 1;
            match element.kind() {
                ElementKind::Text => self.text_count += 1,
                ElementKind::TableRow => self.table_row_count += 1,
                ElementKind::Image => self.image_count += 1,
            }
        }
    }

    /// Count one definition unit.
    pub fn add_unit(&mut self, unit: &DefinitionUnit) {
        self.definition_count += 1;
        self.continuation_count += unit.continuation_count() as u32;
    }

    /// Count the image links of finished records.
    pub fn count_links(&mut self, records: &[DefinitionRecord]) {
        for record in records {
            if record.has_images() {
                self.linked_record_count += 1;
                self.linked_image_count += record.images.len() as u32;
            }
        }
    }

    /// Number of text elements that belonged to no definition.
    pub fn dropped_text_count(&self) -> u32 {
        self.text_count
            .saturating_sub(self.definition_count + self.continuation_count)
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &SegmentStats) {
        self.document_count += other.document_count;
        self.element_count += other.element_count;
        self.text_count += other.text_count;
        self.table_row_count += other.table_row_count;
        self.image_count += other.image_count;
        self.definition_count += other.definition_count;
        self.continuation_count += other.continuation_count;
        self.linked_record_count += other.linked_record_count;
        self.linked_image_count += other.linked_image_count;
    }
}
