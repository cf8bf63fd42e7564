//! Error types for defrip library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for defrip operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reconstructing definitions.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not valid JSON, or could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input JSON is valid but is not an array of elements.
    #[error("Not an element stream: expected a JSON array of elements")]
    NotAnElementStream,

    /// An element in the stream has an unexpected shape.
    #[error("Malformed element at index {index}: {reason}")]
    MalformedElement {
        /// Position of the element in the stream
        index: usize,
        /// What was wrong with it
        reason: String,
    },

    /// The page layout used for image placement is unusable.
    #[error("Layout error: {0}")]
    Layout(String),

    /// Error while rendering output.
    #[error("Rendering error: {0}")]
    Render(String),

    /// A batch directory contained nothing to process.
    #[error("No raw element streams found in {}", .0.display())]
    NoInputFiles(PathBuf),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a malformed element error.
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Error::MalformedElement {
            index,
            reason: reason.into(),
        }
    }
}
