//! Operation handlers.
//!
//! Five independent transformations share one shape: decode the inputs,
//! pick pages or images, and serialize a fresh document. Each handler
//! implements [`Operation`] for its own request type; [`execute`] dispatches a
//! [`Request`] to the matching handler.

pub mod delete;
pub mod encrypt;
pub mod extract;
pub mod images;
pub mod merge;

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, warn};

pub use delete::PageRemover;
pub use encrypt::Locker;
pub use extract::PageExtractor;
pub use images::{ImageConverter, NormalizedImage};
pub use merge::Merger;

use crate::config::WriteOptions;
use crate::error::{PdfSmithError, Result};
use crate::request::Request;
use crate::utils::format_file_size;

/// MIME type of every artifact.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// The five operations pdfsmith offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Concatenate PDFs.
    Merge,
    /// Keep selected pages.
    Extract,
    /// Remove selected pages.
    Delete,
    /// Convert images to a PDF.
    Images,
    /// Lock a PDF with a password.
    Encrypt,
}

impl OperationKind {
    /// Every operation, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Merge,
        Self::Extract,
        Self::Delete,
        Self::Images,
        Self::Encrypt,
    ];

    /// Short machine name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Extract => "extract",
            Self::Delete => "delete",
            Self::Images => "images",
            Self::Encrypt => "encrypt",
        }
    }

    /// Menu title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Merge => "Merge PDFs",
            Self::Extract => "Extract pages",
            Self::Delete => "Delete pages",
            Self::Images => "Images to PDF",
            Self::Encrypt => "Set password",
        }
    }

    /// One-line description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Merge => "Combine several PDFs into one, in the order given",
            Self::Extract => "Keep only the chosen pages, in the order chosen",
            Self::Delete => "Remove the chosen pages, keeping the rest in order",
            Self::Images => "Turn PNG and JPEG images into a PDF, one page per image",
            Self::Encrypt => "Require a password to open a PDF",
        }
    }

    /// Lower-case file extensions accepted as input.
    pub fn accepted_extensions(self) -> &'static [&'static str] {
        match self {
            Self::Images => &["png", "jpg", "jpeg"],
            _ => &["pdf"],
        }
    }

    /// Fixed filename of the artifact.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Merge => "merged.pdf",
            Self::Extract => "extracted.pdf",
            Self::Delete => "deleted.pdf",
            Self::Images => "images.pdf",
            Self::Encrypt => "locked.pdf",
        }
    }

    /// Whether the operation needs a page selection.
    pub fn needs_selection(self) -> bool {
        matches!(self, Self::Extract | Self::Delete)
    }

    /// Whether the operation needs a password.
    pub fn needs_credential(self) -> bool {
        self == Self::Encrypt
    }

    /// Whether the operation takes more than one input file.
    pub fn accepts_multiple(self) -> bool {
        matches!(self, Self::Merge | Self::Images)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OperationKind {
    type Err = PdfSmithError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                PdfSmithError::invalid_config(format!(
                    "Unknown operation: {s}. Must be one of: merge, extract, delete, images, encrypt"
                ))
            })
    }
}

/// Figures describing one run of an operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OperationStatistics {
    /// Number of input files decoded.
    pub files_processed: usize,

    /// Total size of the inputs in bytes.
    pub input_size: u64,

    /// Pages in the artifact.
    pub page_count: usize,

    /// Wall time spent in the handler.
    #[serde(serialize_with = "serialize_millis", rename = "elapsed_ms")]
    pub elapsed: Duration,
}

impl OperationStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }
}

fn serialize_millis<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// A finished document ready for download.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Operation that produced it.
    pub kind: OperationKind,

    /// Fixed download filename.
    pub file_name: String,

    /// Always [`PDF_MIME_TYPE`].
    pub mime_type: &'static str,

    /// Serialized PDF.
    pub bytes: Vec<u8>,

    /// Run statistics.
    pub statistics: OperationStatistics,
}

impl Artifact {
    pub(crate) fn new(kind: OperationKind, bytes: Vec<u8>, statistics: OperationStatistics) -> Self {
        Self {
            kind,
            file_name: kind.file_name().to_string(),
            mime_type: PDF_MIME_TYPE,
            bytes,
            statistics,
        }
    }

    /// Size of the serialized document in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if the document is empty. Never the case for a built artifact.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A single transformation from a request to an artifact.
pub trait Operation {
    /// Which operation this handler implements.
    const KIND: OperationKind;

    /// Inputs the handler consumes.
    type Request;

    /// Run the transformation.
    fn execute(&self, request: &Self::Request, options: &WriteOptions) -> Result<Artifact>;
}

/// Times a handler and fills in the elapsed field of its statistics.
pub(crate) fn timed<F>(f: F) -> Result<Artifact>
where
    F: FnOnce() -> Result<Artifact>,
{
    let start = Instant::now();
    let mut artifact = f()?;
    artifact.statistics.elapsed = start.elapsed();
    Ok(artifact)
}

/// Check preconditions and run the handler matching `request`.
///
/// # Errors
///
/// Validation errors are reported before any input is decoded.
pub fn execute(request: &Request, options: &WriteOptions) -> Result<Artifact> {
    request.check_preconditions()?;

    let result = match request {
        Request::Merge(r) => Merger::new().execute(r, options),
        Request::Extract(r) => PageExtractor::new().execute(r, options),
        Request::Delete(r) => PageRemover::new().execute(r, options),
        Request::Images(r) => ImageConverter::new().execute(r, options),
        Request::Encrypt(r) => Locker::new().execute(r, options),
    };

    match &result {
        Ok(artifact) => info!(
            operation = %request.kind(),
            pages = artifact.statistics.page_count,
            bytes = artifact.len(),
            "Operation finished"
        ),
        Err(e) => warn!(operation = %request.kind(), error = %e, "Operation failed"),
    }

    result
}

/// Run [`execute`] on the blocking thread pool.
pub async fn execute_blocking(request: Request, options: WriteOptions) -> Result<Artifact> {
    tokio::task::spawn_blocking(move || execute(&request, &options))
        .await
        .map_err(|e| PdfSmithError::other(format!("Operation task failed: {e}")))?
}
