//! CLI argument parsing for pdfsmith.
//!
//! Defines the command-line interface with `clap`. The build script includes
//! this file to render the man page, so it only depends on `clap` and
//! `pdfsmith`.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};

use pdfsmith::config::{CompressionLevel, Config, OutputFormat, OverwriteMode};
use pdfsmith::error::Result;

/// Merge, split, convert and lock PDF files.
///
/// Every command reads its inputs, builds a new document in memory and
/// writes it to a fixed filename (merged.pdf, extracted.pdf, deleted.pdf,
/// images.pdf or locked.pdf) inside the output directory.
#[derive(Parser, Debug)]
#[command(name = "pdfsmith")]
#[command(version)]
#[command(about = "Merge, split, convert and lock PDF files", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Options shared by every command
    #[command(flatten)]
    pub options: SharedOptions,
}

/// Flags accepted by every command.
#[derive(Args, Debug, Clone)]
pub struct SharedOptions {
    /// Directory the result is written into
    ///
    /// The filename is fixed per operation, e.g. merged.pdf for merge.
    #[arg(short = 'd', long, value_name = "DIR", default_value = ".", global = true)]
    pub output_dir: PathBuf,

    /// Force overwrite of an existing result without confirmation
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Never overwrite an existing result
    ///
    /// If the result file already exists, exit with an error instead of
    /// prompting or overwriting.
    #[arg(long, conflicts_with = "force", global = true)]
    pub no_clobber: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    pub quiet: bool,

    /// Verbose output - show statistics and debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Dry run - run the operation but do not write the result
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// Compression level for the result
    ///
    /// - none: Streams are written as they are
    /// - standard: Flate-compress streams (default)
    /// - maximum: Compress and drop unreferenced objects
    #[arg(short, long, value_name = "LEVEL", default_value = "standard", global = true)]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Write the resulting PDF to standard output instead of a file
    #[arg(long, global = true)]
    pub stdout: bool,

    /// How results and errors are reported
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    #[arg(value_parser = ["text", "json"])]
    pub format: String,

    /// Number of input files read concurrently
    ///
    /// Default is number of CPU cores.
    #[arg(short, long, value_name = "N", global = true)]
    pub jobs: Option<usize>,
}

/// The available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the available operations
    List,

    /// Show page count and details of PDF files
    Info {
        /// PDF files or glob patterns
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<String>,
    },

    /// Combine PDFs into merged.pdf, in the order given
    ///
    /// Examples:
    ///   pdfsmith merge a.pdf b.pdf
    ///   pdfsmith merge chapter*.pdf -d out
    Merge {
        /// PDF files or glob patterns
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<String>,
    },

    /// Keep the chosen pages, in the order chosen, in extracted.pdf
    ///
    /// Example:
    ///   pdfsmith extract report.pdf --pages 4,1
    Extract {
        /// Source PDF
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Pages to keep, e.g. "4,1" or "1-3,7" (1-based)
        #[arg(short, long, value_name = "LIST")]
        pages: String,
    },

    /// Remove the chosen pages and keep the rest in deleted.pdf
    ///
    /// Example:
    ///   pdfsmith delete report.pdf --pages 2,4
    Delete {
        /// Source PDF
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Pages to remove, e.g. "2,4" or "5-9" (1-based)
        #[arg(short, long, value_name = "LIST")]
        pages: String,
    },

    /// Turn PNG and JPEG images into images.pdf, one page per image
    Images {
        /// Image files or glob patterns
        #[arg(required = true, value_name = "IMAGE")]
        inputs: Vec<String>,
    },

    /// Require a password to open a PDF; writes locked.pdf
    Lock {
        /// Source PDF
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Password for the result
        ///
        /// Asked for on the terminal, without echo, when neither this flag
        /// nor PDFSMITH_PASSWORD is set.
        #[arg(short, long, env = "PDFSMITH_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns an error if the compression level or format is unknown or the
    /// resulting configuration is inconsistent.
    pub fn to_config(&self) -> Result<Config> {
        let options = &self.options;

        let overwrite_mode = if options.force {
            OverwriteMode::Force
        } else if options.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let config = Config {
            output_dir: options.output_dir.clone(),
            overwrite_mode,
            quiet: options.quiet,
            verbose: options.verbose,
            dry_run: options.dry_run,
            compression: CompressionLevel::from_str(&options.compression)?,
            format: OutputFormat::from_str(&options.format)?,
            to_stdout: options.stdout,
            jobs: options.jobs,
        };

        config.validate()?;

        Ok(config)
    }
}
