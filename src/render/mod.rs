//! Record assembly and output rendering.

mod builder;
mod crossref;
mod json;
mod result;

pub use builder::RecordBuilder;
pub use crossref::CrossLinker;
pub use json::{from_json, to_json, JsonFormat};
pub use result::SegmentStats;
