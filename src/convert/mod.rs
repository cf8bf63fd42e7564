//! Document conversion: element stream in, definition collection out.
//!
//! # Example
//!
//! ```no_run
//! use defrip::convert::{ConvertOptions, Converter};
//!
//! fn main() -> defrip::Result<()> {
//!     let options = ConvertOptions::new().with_image_dir("json/images");
//!     let result = Converter::new(options).convert_file("json/bylaw_RAW.json")?;
//!     println!("{} definitions", result.records.len());
//!     Ok(())
//! }
//! ```

mod batch;

pub use batch::{
    run_batch, run_batch_with_progress, BatchOptions, BatchReport, DocumentOutcome,
};

use std::fs;
use std::path::{Path, PathBuf};

use crate::associate::{place_images, ImageIndex, PositionalAssociator};
use crate::error::Result;
use crate::model::{DefinitionRecord, ElementStream, PageLayout};
use crate::parser::{ParseOptions, Segmenter, StreamParser};
use crate::render::{to_json, CrossLinker, JsonFormat, RecordBuilder, SegmentStats};

/// Options for document conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Parsing options
    pub parse: ParseOptions,

    /// Directory holding extracted images (none = no image linking)
    pub image_dir: Option<PathBuf>,

    /// Output JSON format
    pub format: JsonFormat,

    /// Annotate term mentions in definition bodies
    pub cross_links: bool,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set parsing options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Set the image directory.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = Some(dir.into());
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Enable or disable cross-reference annotation.
    pub fn with_cross_links(mut self, enabled: bool) -> Self {
        self.cross_links = enabled;
        self
    }
}

/// Result of converting one document.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Records in segmenter order
    pub records: Vec<DefinitionRecord>,

    /// Conversion statistics
    pub stats: SegmentStats,
}

impl ConvertResult {
    /// Render the records as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        to_json(&self.records, format)
    }
}

/// Converts element streams into definition collections.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
    segmenter: Segmenter,
}

impl Converter {
    /// Create a converter.
    pub fn new(options: ConvertOptions) -> Self {
        let segmenter = Segmenter::with_options(options.parse.clone());
        Self { options, segmenter }
    }

    /// Get the options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert a raw element stream file.
    pub fn convert_file<P: AsRef<Path>>(&self, path: P) -> Result<ConvertResult> {
        let stream = StreamParser::open_with_options(path, self.options.parse.clone())?.parse()?;
        self.convert_stream(&stream)
    }

    /// Convert raw element stream JSON bytes.
    pub fn convert_bytes(&self, data: &[u8]) -> Result<ConvertResult> {
        let stream =
            StreamParser::from_bytes_with_options(data, self.options.parse.clone()).parse()?;
        self.convert_stream(&stream)
    }

    /// Convert a decoded element stream.
    ///
    /// The image directory is listed on every call, so images placed for
    /// this document beforehand are visible to the linker.
    pub fn convert_stream(&self, stream: &ElementStream) -> Result<ConvertResult> {
        let index = match &self.options.image_dir {
            Some(dir) => ImageIndex::from_dir(dir)?,
            None => ImageIndex::new(),
        };

        let mut stats = SegmentStats::new();
        stats.count_stream(stream);

        let units: Vec<_> = self
            .segmenter
            .units(stream.as_slice())
            .inspect(|unit| stats.add_unit(unit))
            .collect();

        let mut records = RecordBuilder::new()
            .with_classification(self.options.parse.classification)
            .with_images(&index)
            .build_all(units);

        if self.options.cross_links {
            records = CrossLinker::new(&records).apply(records);
        }

        stats.count_links(&records);
        log::debug!(
            "Segmented {} definitions ({} continuation lines, {} dropped text elements)",
            stats.definition_count,
            stats.continuation_count,
            stats.dropped_text_count()
        );

        Ok(ConvertResult { records, stats })
    }

    /// Convert a file and write the collection to `output`.
    pub fn convert_to_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<ConvertResult> {
        let result = self.convert_file(input)?;
        let json = result.to_json(self.options.format)?;
        if let Some(parent) = output.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output, json)?;
        Ok(result)
    }

    /// Name and copy the images of a page layout into the image directory.
    ///
    /// Returns the number of images placed; zero when no image directory is
    /// configured.
    pub fn place_layout_images<P: AsRef<Path>>(&self, layout_path: P) -> Result<usize> {
        let Some(dir) = &self.options.image_dir else {
            return Ok(0);
        };
        let layout = PageLayout::from_path(layout_path)?;
        let assignments = PositionalAssociator::new().assign(&layout);
        Ok(place_images(&assignments, dir)?.len())
    }
}
