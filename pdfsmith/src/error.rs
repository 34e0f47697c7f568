//! Error types for pdfsmith.
//!
//! Every operation reports failures through [`PdfSmithError`]. Errors are
//! grouped into categories so a presentation layer can decide how to surface
//! them without matching on every variant:
//!
//! - **Validation**: the user omitted something required (no pages chosen,
//!   empty password) or chose something impossible (page out of range).
//! - **Decode**: an uploaded buffer is not a valid PDF or image.
//! - **I/O**: reading inputs or writing the output file failed.
//! - **Internal**: building or encrypting the output document failed.

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfsmith operations.
pub type Result<T> = std::result::Result<T, PdfSmithError>;

/// Broad classification of an error, used to pick a message style and exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// The request is incomplete or inconsistent. Nothing was written.
    Validation,
    /// An input could not be decoded as a PDF or image.
    Decode,
    /// Filesystem access failed.
    Io,
    /// The transformation itself failed.
    Internal,
}

/// Main error type for pdfsmith operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfSmithError {
    /// The operation was invoked without any input file.
    #[error("No input files selected")]
    NoFilesSelected,

    /// Extract or delete was invoked with an empty page selection.
    #[error("No pages chosen. Select at least one page")]
    NoPagesChosen,

    /// Encrypt was invoked with an empty password.
    #[error("Password must not be empty")]
    EmptyPassword,

    /// A selected page does not exist in the source document.
    #[error(
        "Page {page} is out of range\n  Document has {total} page(s). Page numbers must be between 1 and {total}"
    )]
    PageOutOfRange {
        /// The offending 1-based page number.
        page: u32,
        /// Number of pages in the source document.
        total: u32,
    },

    /// A page selection string could not be parsed.
    #[error("Invalid page selection '{input}'\n  Reason: {reason}")]
    InvalidSelection {
        /// The text the user entered.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Delete was asked to remove every page of the document.
    #[error("Cannot delete all {total} page(s); the result would be an empty document")]
    AllPagesDeleted {
        /// Number of pages in the source document.
        total: u32,
    },

    /// An input file does not carry an extension accepted by the operation.
    #[error("Unsupported input: {name}\n  Expected one of: {expected}")]
    UnsupportedInput {
        /// Name of the rejected input.
        name: String,
        /// Comma-separated list of accepted extensions.
        expected: String,
    },

    /// Input file was not found.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// Input file is not accessible (permission denied, etc.).
    #[error("Cannot access file: {}\n  Reason: {source}", path.display())]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Uploaded bytes could not be parsed as a PDF.
    #[error("Failed to load PDF: {name}\n  Reason: {reason}")]
    FailedToLoadPdf {
        /// Name of the input.
        name: String,
        /// Reason reported by the PDF library.
        reason: String,
    },

    /// PDF parsed but its structure is unusable.
    #[error("Corrupted or invalid PDF: {name}\n  Details: {details}")]
    CorruptedPdf {
        /// Name of the input.
        name: String,
        /// Details about the corruption.
        details: String,
    },

    /// PDF is password protected and cannot be processed.
    #[error(
        "PDF is encrypted and cannot be processed: {name}\n  Hint: Remove the password with the tool that set it, then try again"
    )]
    EncryptedPdf {
        /// Name of the input.
        name: String,
    },

    /// Image is not one of the accepted formats.
    #[error("Unsupported image format: {name}\n  Only PNG and JPEG images are accepted")]
    UnsupportedImage {
        /// Name of the input.
        name: String,
    },

    /// Image bytes could not be decoded.
    #[error("Failed to decode image: {name}\n  Reason: {source}")]
    FailedToDecodeImage {
        /// Name of the input.
        name: String,
        /// Error reported by the image library.
        source: image::ImageError,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  Use --force to overwrite or choose a different output directory",
        path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to write the output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Assembling the output document failed.
    #[error("Failed to build output document: {reason}")]
    BuildFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Applying the password to the output failed.
    #[error("Failed to encrypt output document: {reason}")]
    EncryptionFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl PdfSmithError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a CorruptedPdf error.
    pub fn corrupted_pdf(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self::CorruptedPdf {
            name: name.into(),
            details: details.into(),
        }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(name: impl Into<String>) -> Self {
        Self::EncryptedPdf { name: name.into() }
    }

    /// Create an InvalidSelection error.
    pub fn invalid_selection(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSelection {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create a BuildFailed error.
    pub fn build_failed(reason: impl Into<String>) -> Self {
        Self::BuildFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoFilesSelected
            | Self::NoPagesChosen
            | Self::EmptyPassword
            | Self::PageOutOfRange { .. }
            | Self::InvalidSelection { .. }
            | Self::AllPagesDeleted { .. }
            | Self::UnsupportedInput { .. }
            | Self::InvalidConfig { .. } => ErrorCategory::Validation,
            Self::FailedToLoadPdf { .. }
            | Self::CorruptedPdf { .. }
            | Self::EncryptedPdf { .. }
            | Self::UnsupportedImage { .. }
            | Self::FailedToDecodeImage { .. } => ErrorCategory::Decode,
            Self::FileNotFound { .. }
            | Self::NotAFile { .. }
            | Self::FileNotAccessible { .. }
            | Self::OutputExists { .. }
            | Self::FailedToWrite { .. }
            | Self::Io { .. } => ErrorCategory::Io,
            Self::BuildFailed { .. }
            | Self::EncryptionFailed { .. }
            | Self::Cancelled
            | Self::Other { .. } => ErrorCategory::Internal,
        }
    }

    /// Check if the user can fix this error by changing their input.
    pub fn is_validation(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } | Self::NotAFile { .. } | Self::FileNotAccessible { .. } => 2,
            Self::FailedToLoadPdf { .. }
            | Self::CorruptedPdf { .. }
            | Self::EncryptedPdf { .. }
            | Self::UnsupportedImage { .. }
            | Self::FailedToDecodeImage { .. } => 3,
            Self::OutputExists { .. } => 4,
            Self::FailedToWrite { .. } | Self::Io { .. } => 5,
            Self::BuildFailed { .. } | Self::EncryptionFailed { .. } => 6,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            _ => 1,
        }
    }
}
