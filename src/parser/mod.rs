//! Element stream reading and definition segmentation.

mod cleanup;
mod options;
mod pattern;
mod segmenter;
pub mod slug;
mod stream;

pub use cleanup::{CleanupOptions, TextCleanup};
pub use options::{ErrorMode, ParseOptions};
pub use pattern::{DefinitionMatcher, DefinitionStart};
pub use segmenter::{DefinitionUnit, Definitions, Segmenter};
pub use slug::{normalize, strip_emphasis};
pub use stream::StreamParser;
