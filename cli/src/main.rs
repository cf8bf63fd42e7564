//! defrip CLI - definition reconstruction tool

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use defrip::associate::{place_images, ImageIndex, PositionalAssociator};
use defrip::convert::{run_batch_with_progress, DocumentOutcome};
use defrip::detect::find_raw_streams;
use defrip::{
    normalize, BatchOptions, Classification, ConvertOptions, Converter, ElementKind, JsonFormat,
    PageLayout, ParseOptions, SegmentStats, Segmenter, StreamParser,
};

#[derive(Parser)]
#[command(name = "defrip")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Rebuild definition records from extracted document elements", long_about = None)]
struct Cli {
    /// Input raw element stream, or a directory of them
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Image directory used for linking
    #[arg(long, value_name = "DIR", env = "DEFRIP_IMAGE_DIR")]
    images: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one raw element stream to a definition collection
    Convert {
        /// Input raw element stream
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Image directory used for linking
        #[arg(long, value_name = "DIR", env = "DEFRIP_IMAGE_DIR")]
        images: Option<PathBuf>,

        #[command(flatten)]
        flags: ConvertFlags,
    },

    /// Convert every *_RAW.json stream in a directory
    Batch {
        /// Input directory
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory (default: <DIR>/final)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Image directory (default: <DIR>/images)
        #[arg(long, value_name = "DIR", env = "DEFRIP_IMAGE_DIR")]
        images: Option<PathBuf>,

        /// Process documents one at a time
        #[arg(long)]
        sequential: bool,

        /// Ignore *_LAYOUT.json files
        #[arg(long)]
        no_place: bool,

        #[command(flatten)]
        flags: ConvertFlags,
    },

    /// Name and copy images by their position under definition terms
    Rip {
        /// Page layout file
        #[arg(value_name = "LAYOUT")]
        layout: PathBuf,

        /// Destination image directory
        #[arg(long, value_name = "DIR", env = "DEFRIP_IMAGE_DIR")]
        images: PathBuf,

        /// Print the assignments without copying
        #[arg(long)]
        dry_run: bool,
    },

    /// List the images linked to a term identifier
    Link {
        /// Term identifier
        #[arg(value_name = "TERM_ID")]
        term_id: String,

        /// Image directory
        #[arg(long, value_name = "DIR", env = "DEFRIP_IMAGE_DIR")]
        images: PathBuf,
    },

    /// Print the identifier for a term
    Slug {
        /// Display term
        #[arg(value_name = "TERM")]
        term: String,
    },

    /// Show element stream statistics
    Info {
        /// Input raw element stream
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args, Clone, Copy, Default)]
struct ConvertFlags {
    /// Output compact JSON
    #[arg(long)]
    compact: bool,

    /// Skip malformed elements instead of failing
    #[arg(long)]
    lenient: bool,

    /// Annotate term mentions in definition bodies
    #[arg(long)]
    cross_links: bool,

    /// Normalize Unicode and bullet glyphs
    #[arg(long)]
    normalize: bool,

    /// Classification given to every record
    #[arg(long = "type", value_enum, default_value = "general")]
    classification: RecordType,
}

impl ConvertFlags {
    fn convert_options(&self, images: Option<&Path>) -> ConvertOptions {
        let mut parse = ParseOptions::new().with_classification(self.classification.into());
        if self.lenient {
            parse = parse.lenient();
        }
        if self.normalize {
            parse = parse.normalized();
        }

        let mut options = ConvertOptions::new()
            .with_parse_options(parse)
            .with_format(if self.compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            })
            .with_cross_links(self.cross_links);
        if let Some(dir) = images {
            options = options.with_image_dir(dir);
        }
        options
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Default, ValueEnum)]
enum RecordType {
    /// General definitions
    #[default]
    General,
    /// Use definitions
    Use,
    /// General and use definitions
    GeneralUse,
}

impl From<RecordType> for Classification {
    fn from(kind: RecordType) -> Self {
        match kind {
            RecordType::General => Classification::General,
            RecordType::Use => Classification::Use,
            RecordType::GeneralUse => Classification::GeneralUse,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            images,
            flags,
        }) => cmd_convert(&input, output.as_deref(), images.as_deref(), flags),
        Some(Commands::Batch {
            input,
            output,
            images,
            sequential,
            no_place,
            flags,
        }) => cmd_batch(
            &input,
            output.as_deref(),
            images.as_deref(),
            sequential,
            no_place,
            flags,
        ),
        Some(Commands::Rip {
            layout,
            images,
            dry_run,
        }) => cmd_rip(&layout, &images, dry_run),
        Some(Commands::Link { term_id, images }) => cmd_link(&term_id, &images),
        Some(Commands::Slug { term }) => {
            println!("{}", normalize(&term));
            Ok(())
        }
        Some(Commands::Info { input, json }) => cmd_info(&input, json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        // Default behavior: batch a directory, convert a file
        None => match cli.input {
            Some(input) if input.is_dir() => cmd_batch(
                &input,
                cli.output.as_deref(),
                cli.images.as_deref(),
                false,
                false,
                ConvertFlags::default(),
            ),
            Some(input) => cmd_convert(
                &input,
                cli.output.as_deref(),
                cli.images.as_deref(),
                ConvertFlags::default(),
            ),
            None => {
                println!("{}", "Usage: defrip <FILE|DIR> [OUTPUT]".yellow());
                println!("       defrip --help for more information");
                Ok(())
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    images: Option<&Path>,
    flags: ConvertFlags,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = flags.convert_options(images);
    let format = options.format;
    let converter = Converter::new(options);

    match output {
        Some(path) => {
            let result = converter.convert_to_file(input, path)?;
            println!(
                "{} {} definitions to {}",
                "Saved".green(),
                result.records.len(),
                path.display()
            );
        }
        None => {
            let result = converter.convert_file(input)?;
            println!("{}", result.to_json(format)?);
        }
    }

    Ok(())
}

fn cmd_batch(
    input: &Path,
    output: Option<&Path>,
    images: Option<&Path>,
    sequential: bool,
    no_place: bool,
    flags: ConvertFlags,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = BatchOptions::new()
        .with_convert_options(flags.convert_options(images))
        .with_parallel(!sequential)
        .with_image_placement(!no_place);
    if let Some(dir) = output {
        options = options.with_output_dir(dir);
    }

    let total = find_raw_streams(input)?.len() as u64;
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = run_batch_with_progress(input, &options, |outcome| {
        if let Some(name) = outcome.input().file_name() {
            pb.set_message(name.to_string_lossy().into_owned());
        }
        pb.inc(1);
    })?;
    pb.finish_with_message("Done!");

    println!();
    for outcome in &report.outcomes {
        match outcome {
            DocumentOutcome::Converted {
                input,
                output,
                images_placed,
                stats,
            } => println!(
                "  {} {} -> {} ({} definitions, {} images placed)",
                "✓".green(),
                input.display(),
                output.display(),
                stats.definition_count,
                images_placed
            ),
            DocumentOutcome::Failed { input, error } => {
                println!("  {} {}: {}", "✗".red(), input.display(), error)
            }
        }
    }

    let stats = report.stats();
    println!(
        "\n{} {} converted, {} failed, {} definitions, {} linked images",
        "Summary:".cyan().bold(),
        report.succeeded(),
        report.failed(),
        stats.definition_count,
        stats.linked_image_count
    );

    if report.is_success() {
        Ok(())
    } else {
        Err(format!("{} documents failed", report.failed()).into())
    }
}

fn cmd_rip(layout: &Path, images: &Path, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let layout = PageLayout::from_path(layout)?;
    let assignments = PositionalAssociator::new().assign(&layout);
    log::debug!(
        "{} of {} images have a position",
        assignments.len(),
        layout.image_count()
    );

    if dry_run {
        for a in &assignments {
            println!(
                "{} p{} {} -> {}",
                "Would save".yellow(),
                a.page,
                a.source.display(),
                a.filename
            );
        }
        return Ok(());
    }

    let written = place_images(&assignments, images)?;
    for path in &written {
        println!("{} {}", "Saved".green(), path.display());
    }
    println!("\n{} {} images placed", "Done!".green().bold(), written.len());

    Ok(())
}

fn cmd_link(term_id: &str, images: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let index = ImageIndex::from_dir(images)?;
    let linked = index.link(term_id);
    if linked.is_empty() {
        println!("{} {}", "No images for".yellow(), term_id);
    } else {
        for name in linked.iter() {
            println!("{}", name);
        }
    }
    Ok(())
}

fn cmd_info(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Lenient so statistics can be shown even for damaged streams
    let options = ParseOptions::new().lenient();
    let stream = StreamParser::open_with_options(input, options.clone())?.parse()?;

    let mut stats = SegmentStats::new();
    stats.count_stream(&stream);
    for unit in Segmenter::with_options(options).units(stream.as_slice()) {
        stats.add_unit(&unit);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Stream Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Elements".bold(), stats.element_count);
    println!("{}: {}", "Text".bold(), stream.count(ElementKind::Text));
    println!("{}: {}", "Table rows".bold(), stream.count(ElementKind::TableRow));
    println!("{}: {}", "Images".bold(), stream.count(ElementKind::Image));

    println!();
    println!("{}", "Definitions".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Definitions".bold(), stats.definition_count);
    println!("{}: {}", "Continuation lines".bold(), stats.continuation_count);
    println!("{}: {}", "Unclaimed text".bold(), stats.dropped_text_count());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "defrip".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Definition reconstruction tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_cli_parses_batch() {
        let cli = Cli::try_parse_from(["defrip", "batch", "json", "--sequential", "--lenient"])
            .unwrap();
        match cli.command {
            Some(Commands::Batch {
                sequential, flags, ..
            }) => {
                assert!(sequential);
                assert!(flags.lenient);
            }
            _ => panic!("expected batch"),
        }
    }

    #[test]
    fn test_convert_flags_options() {
        let flags = ConvertFlags {
            compact: true,
            lenient: true,
            classification: RecordType::Use,
            ..Default::default()
        };
        let options = flags.convert_options(Some(Path::new("images")));
        assert_eq!(options.format, JsonFormat::Compact);
        assert!(options.parse.is_lenient());
        assert_eq!(options.parse.classification, Classification::Use);
        assert_eq!(options.image_dir, Some(PathBuf::from("images")));
    }

    #[test]
    fn test_cmd_convert_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bylaw_RAW.json");
        let output = dir.path().join("out/bylaw_FINAL.json");
        fs::write(&input, r#"[{"type": "text", "content": "Lot means a parcel"}]"#).unwrap();

        cmd_convert(&input, Some(&output), None, ConvertFlags::default()).unwrap();
        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains(r#""termID": "Lot""#));
    }
}
