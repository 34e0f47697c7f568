//! Presentation of operations, inputs, results and errors.
//!
//! The transformation layer never prints. Front ends pick a [`Presenter`]
//! and print whatever it renders:
//! - [`TextPresenter`] for people, built on [`OutputFormatter`]
//! - [`JsonPresenter`] for scripts
//!
//! # Examples
//!
//! ```no_run
//! use pdfsmith::config::Config;
//! use pdfsmith::ops::OperationKind;
//! use pdfsmith::output::create_presenter;
//!
//! # fn example(config: Config) {
//! let presenter = create_presenter(&config);
//! println!("{}", presenter.list_operations(&OperationKind::ALL));
//! # }
//! ```

pub mod formatter;

use std::path::PathBuf;

pub use formatter::{MessageLevel, OutputFormatter};

use serde::Serialize;

use crate::config::{Config, OutputFormat};
use crate::error::{ErrorCategory, PdfSmithError};
use crate::ops::{Artifact, OperationKind, OperationStatistics};
use crate::utils::format_file_size;
use crate::validation::DocumentSummary;

/// Where an artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Destination {
    /// Saved to a file.
    File {
        /// Path of the written file.
        path: PathBuf,
    },
    /// Streamed to standard output.
    Stdout,
    /// Not written; dry run.
    None,
}

/// Everything worth reporting after an operation ran.
#[derive(Debug, Clone, Serialize)]
pub struct OutputReport {
    /// Operation that ran.
    pub operation: OperationKind,
    /// Download filename.
    pub file_name: String,
    /// MIME type of the artifact.
    pub mime_type: &'static str,
    /// Size of the artifact in bytes.
    pub size: u64,
    /// Where the bytes went.
    pub destination: Destination,
    /// Handler statistics.
    pub statistics: OperationStatistics,
}

impl OutputReport {
    /// Describe `artifact` delivered to `destination`.
    pub fn new(artifact: &Artifact, destination: Destination) -> Self {
        Self {
            operation: artifact.kind,
            file_name: artifact.file_name.clone(),
            mime_type: artifact.mime_type,
            size: artifact.len() as u64,
            destination,
            statistics: artifact.statistics.clone(),
        }
    }
}

#[derive(Serialize)]
struct OperationInfo {
    name: &'static str,
    title: &'static str,
    description: &'static str,
    accepted_extensions: &'static [&'static str],
    file_name: &'static str,
    needs_selection: bool,
    needs_credential: bool,
    accepts_multiple: bool,
}

impl From<OperationKind> for OperationInfo {
    fn from(kind: OperationKind) -> Self {
        Self {
            name: kind.name(),
            title: kind.title(),
            description: kind.description(),
            accepted_extensions: kind.accepted_extensions(),
            file_name: kind.file_name(),
            needs_selection: kind.needs_selection(),
            needs_credential: kind.needs_credential(),
            accepts_multiple: kind.accepts_multiple(),
        }
    }
}

#[derive(Serialize)]
struct ErrorReport {
    category: ErrorCategory,
    message: String,
    exit_code: i32,
}

/// Renders results for one kind of audience.
///
/// An empty string means there is nothing to show.
pub trait Presenter {
    /// The operation menu.
    fn list_operations(&self, kinds: &[OperationKind]) -> String;

    /// Details of an uploaded document.
    fn render_input(&self, summary: &DocumentSummary) -> String;

    /// The outcome of an operation.
    fn render_output(&self, report: &OutputReport) -> String;

    /// A failed operation.
    fn render_error(&self, error: &PdfSmithError) -> String;
}

/// Pick the presenter matching `config.format`.
pub fn create_presenter(config: &Config) -> Box<dyn Presenter> {
    match config.format {
        OutputFormat::Text => Box::new(TextPresenter::new(OutputFormatter::from_config(config))),
        OutputFormat::Json => Box::new(JsonPresenter::new()),
    }
}

/// Human-readable presentation.
#[derive(Debug, Clone, Default)]
pub struct TextPresenter {
    formatter: OutputFormatter,
}

impl TextPresenter {
    /// Create a presenter on top of `formatter`.
    pub fn new(formatter: OutputFormatter) -> Self {
        Self { formatter }
    }
}

impl Presenter for TextPresenter {
    fn list_operations(&self, kinds: &[OperationKind]) -> String {
        if !self.formatter.is_verbose() {
            let width = kinds.iter().map(|k| k.name().len()).max().unwrap_or(0);
            return kinds
                .iter()
                .map(|kind| format!("  {:<width$}  {}", kind.name(), kind.title()))
                .collect::<Vec<_>>()
                .join("\n");
        }

        kinds
            .iter()
            .flat_map(|kind| {
                [
                    format!("{} ({})", kind.title(), kind.name()),
                    format!("  {}", kind.description()),
                    self.formatter
                        .format_detail("Accepts", &kind.accepted_extensions().join(", ")),
                    self.formatter.format_detail("Output", kind.file_name()),
                ]
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_input(&self, summary: &DocumentSummary) -> String {
        let mut lines = vec![format!(
            "{}: {} page(s), PDF {}, {}",
            summary.name,
            summary.page_count,
            summary.version,
            summary.format_file_size()
        )];

        if let Some((width, height)) = summary.page_dimensions {
            lines.push(
                self.formatter
                    .format_detail("First page", &format!("{width:.0} x {height:.0} pt")),
            );
        }
        if self.formatter.is_verbose() {
            lines.push(
                self.formatter
                    .format_detail("Objects", &summary.object_count.to_string()),
            );
        }

        lines.join("\n")
    }

    fn render_output(&self, report: &OutputReport) -> String {
        if self.formatter.is_quiet() {
            return String::new();
        }

        let size = format_file_size(report.size);
        let headline = match &report.destination {
            Destination::File { path } => self.formatter.format(
                MessageLevel::Success,
                &format!("Created {} ({size})", path.display()),
            ),
            Destination::Stdout => self.formatter.format(
                MessageLevel::Success,
                &format!("Streamed {} ({size})", report.file_name),
            ),
            Destination::None => self.formatter.format(
                MessageLevel::Success,
                &format!(
                    "Dry run: {} would be {} with {} page(s)",
                    report.file_name,
                    size,
                    report.statistics.page_count
                ),
            ),
        };

        let mut lines = vec![headline];
        if self.formatter.is_verbose() {
            let stats = &report.statistics;
            lines.push(String::new());
            lines.push("Statistics".to_string());
            lines.push(
                self.formatter
                    .format_detail("Input files", &stats.files_processed.to_string()),
            );
            lines.push(
                self.formatter
                    .format_detail("Input size", &stats.format_input_size()),
            );
            lines.push(
                self.formatter
                    .format_detail("Pages", &stats.page_count.to_string()),
            );
            lines.push(self.formatter.format_detail("Output size", &size));
            lines.push(self.formatter.format_detail(
                "Time",
                &format!("{:.2}s", stats.elapsed.as_secs_f64()),
            ));
        }

        lines.join("\n")
    }

    fn render_error(&self, error: &PdfSmithError) -> String {
        let label = match error.category() {
            ErrorCategory::Validation => "Invalid input",
            ErrorCategory::Decode => "Unreadable input",
            ErrorCategory::Io => "File error",
            ErrorCategory::Internal => "Error",
        };
        self.formatter
            .format(MessageLevel::Error, &format!("{label}: {error}"))
    }
}

/// Machine-readable presentation, one JSON document per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPresenter {
    pretty: bool,
}

impl JsonPresenter {
    /// Create a presenter emitting compact JSON.
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Create a presenter emitting indented JSON.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    fn render<T: Serialize>(&self, value: &T) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|e| format!(r#"{{"error":{{"message":"{e}"}}}}"#))
    }
}

impl Presenter for JsonPresenter {
    fn list_operations(&self, kinds: &[OperationKind]) -> String {
        let infos: Vec<OperationInfo> = kinds.iter().copied().map(OperationInfo::from).collect();
        self.render(&infos)
    }

    fn render_input(&self, summary: &DocumentSummary) -> String {
        self.render(summary)
    }

    fn render_output(&self, report: &OutputReport) -> String {
        self.render(report)
    }

    fn render_error(&self, error: &PdfSmithError) -> String {
        let report = ErrorReport {
            category: error.category(),
            message: error.to_string(),
            exit_code: error.exit_code(),
        };
        self.render(&serde_json::json!({ "error": report }))
    }
}
