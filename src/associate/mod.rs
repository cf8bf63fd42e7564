//! Image-to-term association.
//!
//! Two loosely coupled strategies share the image naming convention:
//! the positional associator names images after the term above them while
//! they are placed, and the linker later collects every image whose name
//! starts with a record's identifier.

pub mod heuristic;
mod linker;

pub use heuristic::{
    place_images, AssociationState, ImageAssignment, PositionalAssociator, FALLBACK_TERM,
};
pub use linker::ImageIndex;
