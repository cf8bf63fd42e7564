//! Data model for element streams, page layouts and definition records.
//!
//! Element streams and page layouts are inputs written by the external
//! extraction step. Definition records are the output of one document run
//! and are never mutated after they are built.

mod document;
pub mod image;
mod element;
mod layout;
mod record;

pub use document::ElementStream;
pub use element::{BoundingBox, ElementKind, RawElement};
pub use layout::{ImageOccurrence, LayoutBlock, LayoutPage, PageLayout};
pub use record::{Classification, DefinitionRecord, ImageList, IMAGE_SEPARATOR};
