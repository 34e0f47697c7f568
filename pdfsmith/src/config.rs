//! Configuration module for pdfsmith.
//!
//! Front ends turn their own arguments into a [`Config`]. The config only
//! carries ambient settings (where output goes, how chatty to be, how hard to
//! compress). What to transform travels separately in a
//! [`Request`](crate::request::Request).

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{PdfSmithError, Result};
use crate::ops::OperationKind;

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// No compression - streams are written as they are.
    None,
    /// Flate-compress uncompressed streams.
    #[default]
    Standard,
    /// Compress and drop unreferenced objects.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = PdfSmithError;

    /// Parse compression level from "none", "standard" or "maximum".
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PdfSmithError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// How results are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human readable status lines.
    #[default]
    Text,
    /// One JSON document per result.
    Json,
}

impl FromStr for OutputFormat {
    type Err = PdfSmithError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(PdfSmithError::invalid_config(format!(
                "Invalid output format: {s}. Must be one of: text, json"
            ))),
        }
    }
}

/// Settings that shape how the output document is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    /// Compression applied before serialization.
    pub compression: CompressionLevel,
}

impl WriteOptions {
    /// Options with the given compression level.
    pub fn with_compression(compression: CompressionLevel) -> Self {
        Self { compression }
    }
}

/// Ambient settings for one pdfsmith invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the artifact is written into under its fixed filename.
    pub output_dir: PathBuf,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Dry run mode - validate and report without writing output.
    pub dry_run: bool,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Presentation format.
    pub format: OutputFormat,

    /// Stream the artifact to stdout instead of a file.
    pub to_stdout: bool,

    /// Number of files read concurrently (None = auto-detect).
    pub jobs: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            overwrite_mode: OverwriteMode::default(),
            quiet: false,
            verbose: false,
            dry_run: false,
            compression: CompressionLevel::default(),
            format: OutputFormat::default(),
            to_stdout: false,
            jobs: None,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Verbose and quiet modes are both enabled
    /// - Jobs count is zero
    /// - Stdout output is combined with verbose text output
    pub fn validate(&self) -> Result<()> {
        if self.verbose && self.quiet {
            return Err(PdfSmithError::invalid_config(
                "Cannot use both --verbose and --quiet",
            ));
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            return Err(PdfSmithError::invalid_config(
                "Number of jobs must be at least 1",
            ));
        }

        if self.to_stdout && self.format == OutputFormat::Json {
            return Err(PdfSmithError::invalid_config(
                "Cannot combine --stdout with --format json",
            ));
        }

        Ok(())
    }

    /// Get the effective number of concurrent reads.
    ///
    /// Returns the configured job count, or the number of CPU cores if auto-detect.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Serialization options derived from this config.
    pub fn write_options(&self) -> WriteOptions {
        WriteOptions::with_compression(self.compression)
    }

    /// Where the artifact of `kind` lands.
    pub fn output_path(&self, kind: OperationKind) -> PathBuf {
        self.output_dir.join(kind.file_name())
    }

    /// Returns the output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Check if status output should be displayed.
    ///
    /// Stdout is reserved for the document when streaming.
    pub fn should_print(&self) -> bool {
        (!self.quiet || self.dry_run) && !self.to_stdout
    }
}
