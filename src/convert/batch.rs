//! Batch conversion of a directory of element streams.
//!
//! The batch runs in two phases. Layout images for every document are placed
//! first, one document at a time in name order, so the shared image directory
//! is settled before anything is linked. Documents are then segmented and
//! written, in parallel when enabled. A failing document is logged and
//! reported without stopping the rest of the batch.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::detect::{final_output_name, find_raw_streams, layout_path_for};
use crate::error::{Error, Result};
use crate::render::SegmentStats;

use super::{ConvertOptions, Converter};

/// Name of the default output directory inside the input directory.
const DEFAULT_OUTPUT_DIR: &str = "final";

/// Name of the default image directory inside the input directory.
const DEFAULT_IMAGE_DIR: &str = "images";

/// Options for batch conversion.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Per-document conversion options
    pub convert: ConvertOptions,

    /// Output directory (default: `<input>/final`)
    pub output_dir: Option<PathBuf>,

    /// Process documents in parallel
    pub parallel: bool,

    /// Place images from `<stem>_LAYOUT.json` before linking
    pub place_images: bool,
}

impl BatchOptions {
    /// Create new batch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set per-document conversion options.
    pub fn with_convert_options(mut self, options: ConvertOptions) -> Self {
        self.convert = options;
        self
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Enable or disable layout-based image placement.
    pub fn with_image_placement(mut self, place: bool) -> Self {
        self.place_images = place;
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            convert: ConvertOptions::default(),
            output_dir: None,
            parallel: true,
            place_images: true,
        }
    }
}

/// Outcome of one document in a batch.
#[derive(Debug, Clone)]
pub enum DocumentOutcome {
    /// The document was converted and written
    Converted {
        /// Raw element stream path
        input: PathBuf,
        /// Written definition collection path
        output: PathBuf,
        /// Number of images placed from the layout
        images_placed: usize,
        /// Conversion statistics
        stats: SegmentStats,
    },

    /// The document failed; nothing was written for it
    Failed {
        /// Raw element stream path
        input: PathBuf,
        /// Error description
        error: String,
    },
}

impl DocumentOutcome {
    /// Raw element stream path of the document.
    pub fn input(&self) -> &Path {
        match self {
            DocumentOutcome::Converted { input, .. } | DocumentOutcome::Failed { input, .. } => {
                input
            }
        }
    }

    /// Check if the document converted successfully.
    pub fn is_success(&self) -> bool {
        matches!(self, DocumentOutcome::Converted { .. })
    }
}

/// Result of a batch run, one outcome per document in name order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Per-document outcomes
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchReport {
    /// Number of converted documents.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of failed documents.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Check if every document converted.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Statistics merged across converted documents.
    pub fn stats(&self) -> SegmentStats {
        let mut total = SegmentStats::new();
        for outcome in &self.outcomes {
            if let DocumentOutcome::Converted { stats, .. } = outcome {
                total.merge(stats);
            }
        }
        total
    }
}

/// Convert every `*_RAW.json` stream in `input_dir`.
pub fn run_batch<P: AsRef<Path>>(input_dir: P, options: &BatchOptions) -> Result<BatchReport> {
    run_batch_with_progress(input_dir, options, |_| {})
}

/// Convert every stream in `input_dir`, calling `on_done` after each
/// document.
///
/// Fails only when the directory cannot be listed or holds no streams.
pub fn run_batch_with_progress<P, F>(
    input_dir: P,
    options: &BatchOptions,
    on_done: F,
) -> Result<BatchReport>
where
    P: AsRef<Path>,
    F: Fn(&DocumentOutcome) + Sync,
{
    let input_dir = input_dir.as_ref();
    let inputs = find_raw_streams(input_dir)?;
    if inputs.is_empty() {
        return Err(Error::NoInputFiles(input_dir.to_path_buf()));
    }

    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| input_dir.join(DEFAULT_OUTPUT_DIR));
    let mut convert = options.convert.clone();
    if convert.image_dir.is_none() {
        convert.image_dir = Some(input_dir.join(DEFAULT_IMAGE_DIR));
    }
    let converter = Converter::new(convert);

    log::info!(
        "Converting {} documents from {}",
        inputs.len(),
        input_dir.display()
    );

    let placements: Vec<Result<usize>> = inputs
        .iter()
        .map(|input| place_document_images(&converter, input, options.place_images))
        .collect();

    let process = |(input, placed): (&PathBuf, &Result<usize>)| {
        let outcome = process_document(&converter, input, &output_dir, placed);
        on_done(&outcome);
        outcome
    };

    let outcomes = if options.parallel {
        inputs.par_iter().zip(placements.par_iter()).map(process).collect()
    } else {
        inputs.iter().zip(placements.iter()).map(process).collect()
    };

    Ok(BatchReport { outcomes })
}

fn place_document_images(
    converter: &Converter,
    input: &Path,
    place_images: bool,
) -> Result<usize> {
    let layout = layout_path_for(input);
    if !place_images || !layout.is_file() {
        return Ok(0);
    }
    let placed = converter.place_layout_images(&layout)?;
    log::debug!("{}: placed {} images", layout.display(), placed);
    Ok(placed)
}

fn process_document(
    converter: &Converter,
    input: &Path,
    output_dir: &Path,
    placed: &Result<usize>,
) -> DocumentOutcome {
    let converted = match placed {
        Ok(images_placed) => convert_document(converter, input, output_dir)
            .map(|(output, stats)| (output, *images_placed, stats))
            .map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    match converted {
        Ok((output, images_placed, stats)) => {
            log::info!(
                "{}: {} definitions -> {}",
                input.display(),
                stats.definition_count,
                output.display()
            );
            DocumentOutcome::Converted {
                input: input.to_path_buf(),
                output,
                images_placed,
                stats,
            }
        }
        Err(error) => {
            log::error!("{}: {}", input.display(), error);
            DocumentOutcome::Failed {
                input: input.to_path_buf(),
                error,
            }
        }
    }
}

fn convert_document(
    converter: &Converter,
    input: &Path,
    output_dir: &Path,
) -> Result<(PathBuf, SegmentStats)> {
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::Other(format!("invalid file name: {}", input.display())))?;
    let output = output_dir.join(final_output_name(name));
    let result = converter.convert_to_file(input, &output)?;
    Ok((output, result.stats))
}
