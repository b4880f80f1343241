//! yolo2flat: YOLO labels to absolute-pixel flat record lists.
//!
//! Reads a directory of images plus a parallel directory of YOLO label
//! files (`class cx cy w h`, normalized) and writes a single list file with
//! one line per labelled image:
//!
//! ```text
//! <image_path> <object_count> <x> <y> <w> <h> <class> ...
//! ```
//!
//! with boxes in absolute pixels, top-left origin. This is the list format
//! SSD/DSFD-style face and person detectors train from.
//!
//! # Modules
//!
//! - [`ir`]: annotation record types and the two text formats
//! - [`conversion`]: the directory-to-list conversion and its report
//! - [`config`]: optional YAML configuration
//! - [`error`]: error types for yolo2flat operations

pub mod config;
pub mod conversion;
pub mod error;
pub mod ir;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use conversion::{convert, convert_with_options, ConversionReport, ConvertOptions};
pub use error::ConvertError;

/// The yolo2flat CLI application.
#[derive(Parser)]
#[command(name = "yolo2flat")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert a YOLO image/label directory pair into a flat record list.
    Convert(ConvertArgs),
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Directory containing the images (.png, .jpg, .jpeg).
    #[arg(long)]
    images: PathBuf,

    /// Directory containing one YOLO .txt label file per image.
    #[arg(long)]
    labels: PathBuf,

    /// Output list file (created or overwritten).
    #[arg(long, short)]
    output: PathBuf,

    /// YAML config file with class mapping and policy settings.
    #[arg(long, env = "YOLO2FLAT_CONFIG")]
    config: Option<PathBuf>,

    /// Class code written for every object (overrides the config default).
    #[arg(long)]
    class_code: Option<u32>,

    /// What to do with a malformed label row ('abort' or 'skip-file').
    #[arg(long)]
    on_malformed: Option<String>,

    /// Write records in file-name order instead of directory order.
    #[arg(long, overrides_with = "no_sort")]
    sort: bool,

    /// Keep directory order even when the config file enables sorting.
    #[arg(long, overrides_with = "sort")]
    no_sort: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    report: String,
}

/// Run the yolo2flat CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), ConvertError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(args),
        None => {
            println!("yolo2flat {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("YOLO labels to absolute-pixel flat record lists.");
            println!();
            println!("Run 'yolo2flat --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the convert subcommand.
fn run_convert(args: ConvertArgs) -> Result<(), ConvertError> {
    // Validate the report format before touching the output file.
    if !matches!(args.report.as_str(), "text" | "json") {
        return Err(ConvertError::UnsupportedFormat(format!(
            "report '{}' (supported: text, json)",
            args.report
        )));
    }

    let options = resolve_options(&args)?;
    let report =
        conversion::convert_with_options(&args.images, &args.labels, &args.output, &options)?;

    match args.report.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => {
            println!(
                "Converted {} -> {}",
                args.images.display(),
                args.output.display()
            );
            print!("{}", report);
            if report.has_skipped_images() {
                println!();
                println!("Some labelled images were dropped; see the warnings above.");
            }
        }
    }

    Ok(())
}

/// Merge config file values with command-line overrides.
fn resolve_options(args: &ConvertArgs) -> Result<ConvertOptions, ConvertError> {
    let mut options = match &args.config {
        Some(path) => config::load_config(path)?.into_options(),
        None => ConvertOptions::default(),
    };

    if let Some(code) = args.class_code {
        options.class_mapping.default_code = code;
    }

    if let Some(name) = &args.on_malformed {
        options.on_malformed = conversion::MalformedPolicy::from_name(name).ok_or_else(|| {
            ConvertError::UnsupportedFormat(format!(
                "malformed policy '{}' (supported: abort, skip-file)",
                name
            ))
        })?;
    }

    if args.sort {
        options.sort_images = true;
    } else if args.no_sort {
        options.sort_images = false;
    }

    Ok(options)
}
