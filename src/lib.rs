//! # defrip
//!
//! Definition reconstruction from extracted document element streams.
//!
//! An upstream extraction step turns a regulatory document into a flat,
//! ordered stream of text, table row and image elements. This library
//! finds the `<term> means <body>` definitions in that stream, rebuilds
//! multi-line definition bodies, associates extracted images with the
//! terms they illustrate, and writes one JSON record per definition.
//!
//! ## Quick Start
//!
//! ```no_run
//! use defrip::{extract_definitions, to_json, JsonFormat};
//!
//! fn main() -> defrip::Result<()> {
//!     let records = extract_definitions("json/bylaw_RAW.json")?;
//!     println!("{}", to_json(&records, JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Segmentation**: Definition starts and continuation lines
//! - **Identifiers**: Filename-safe term slugs shared with image names
//! - **Image association**: Positional naming plus prefix linking
//! - **Cross references**: Optional term mention annotation
//! - **Batch processing**: Uses Rayon across documents

pub mod associate;
pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use associate::{ImageIndex, PositionalAssociator};
pub use convert::{BatchOptions, BatchReport, ConvertOptions, ConvertResult, Converter};
pub use error::{Error, Result};
pub use model::{
    BoundingBox, Classification, DefinitionRecord, ElementKind, ElementStream, ImageList,
    PageLayout, RawElement,
};
pub use parser::{normalize, ParseOptions, Segmenter, StreamParser};
pub use render::{JsonFormat, SegmentStats};

use std::io::Read;
use std::path::{Path, PathBuf};

/// Read a raw element stream file.
///
/// # Example
///
/// ```no_run
/// use defrip::parse_file;
///
/// let stream = parse_file("json/bylaw_RAW.json").unwrap();
/// println!("Elements: {}", stream.len());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ElementStream> {
    StreamParser::open(path)?.parse()
}

/// Read a raw element stream file with custom options.
pub fn parse_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
) -> Result<ElementStream> {
    StreamParser::open_with_options(path, options)?.parse()
}

/// Read a raw element stream from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<ElementStream> {
    StreamParser::from_bytes(data).parse()
}

/// Read a raw element stream from a reader.
pub fn parse_reader<R: Read>(reader: R) -> Result<ElementStream> {
    StreamParser::from_reader(reader)?.parse()
}

/// Extract definition records from a raw element stream file.
///
/// No images are linked; use [`Defrip`] or [`Converter`] with an image
/// directory for that.
pub fn extract_definitions<P: AsRef<Path>>(path: P) -> Result<Vec<DefinitionRecord>> {
    let stream = parse_file(path)?;
    Ok(Segmenter::new().segment(stream.as_slice()))
}

/// Serialize definition records as a JSON collection.
pub fn to_json(records: &[DefinitionRecord], format: JsonFormat) -> Result<String> {
    render::to_json(records, format)
}

/// Builder for converting element streams into definition collections.
///
/// # Example
///
/// ```no_run
/// use defrip::Defrip;
///
/// let json = Defrip::new()
///     .with_image_dir("json/images")
///     .with_cross_links()
///     .lenient()
///     .parse("json/bylaw_RAW.json")?
///     .to_json(defrip::JsonFormat::Pretty)?;
/// # Ok::<(), defrip::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Defrip {
    options: ConvertOptions,
}

impl Defrip {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable lenient parsing mode.
    pub fn lenient(mut self) -> Self {
        self.options.parse = self.options.parse.lenient();
        self
    }

    /// Enable Unicode and glyph normalization.
    pub fn normalized(mut self) -> Self {
        self.options.parse = self.options.parse.normalized();
        self
    }

    /// Set the classification given to records.
    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.options.parse = self.options.parse.with_classification(classification);
        self
    }

    /// Set the image directory used for linking.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options = self.options.with_image_dir(dir);
        self
    }

    /// Annotate term mentions in definition bodies.
    pub fn with_cross_links(mut self) -> Self {
        self.options = self.options.with_cross_links(true);
        self
    }

    /// Convert a raw element stream file.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<ConvertResult> {
        Converter::new(self.options).convert_file(path)
    }

    /// Convert raw element stream bytes.
    pub fn parse_bytes(self, data: &[u8]) -> Result<ConvertResult> {
        Converter::new(self.options).convert_bytes(data)
    }
}
