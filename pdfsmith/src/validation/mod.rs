//! Input validation for pdfsmith.
//!
//! Cheap checks run before any bytes are decoded:
//! - File existence and accessibility
//! - Extension filtering per operation
//!
//! [`Validator::inspect`] decodes a PDF once and summarizes it, which is what
//! a front end needs to populate a page selector.
//!
//! # Examples
//!
//! ```no_run
//! use pdfsmith::ops::OperationKind;
//! use pdfsmith::request::InputFile;
//! use pdfsmith::validation::Validator;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let validator = Validator::new();
//! validator.validate_path(Path::new("report.pdf"), OperationKind::Extract).await?;
//!
//! let input = InputFile::from_path(Path::new("report.pdf")).await?;
//! let summary = validator.inspect(&input)?;
//! println!("Choose from pages {:?}", summary.choices);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::{PdfSmithError, Result};
use crate::io::PdfReader;
use crate::ops::OperationKind;
use crate::request::InputFile;
use crate::selection::PageSelection;
use crate::utils::format_file_size;

/// What a decoded PDF looks like from the outside.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSummary {
    /// Display name of the input.
    pub name: String,

    /// Number of pages.
    pub page_count: u32,

    /// PDF header version, e.g. "1.7".
    pub version: String,

    /// Size of the input in bytes.
    pub file_size: u64,

    /// Width and height of the first page in points.
    pub page_dimensions: Option<(f32, f32)>,

    /// Number of indirect objects.
    pub object_count: usize,

    /// Page numbers a selector may offer, `1..=page_count`.
    pub choices: Vec<u32>,
}

impl DocumentSummary {
    /// Format the input size as a human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Validator for input paths and uploaded documents.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    reader: PdfReader,
}

impl Validator {
    /// Create a new validator with default settings.
    pub fn new() -> Self {
        Self {
            reader: PdfReader::new(),
        }
    }

    /// Check that `path` can be used as an input of `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File does not exist
    /// - Path is a directory
    /// - File is empty
    /// - Extension is not accepted by `kind`
    pub async fn validate_path(&self, path: &Path, kind: OperationKind) -> Result<()> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PdfSmithError::file_not_found(path.to_path_buf())
            } else {
                PdfSmithError::FileNotAccessible {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        if !metadata.is_file() {
            return Err(PdfSmithError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let name = path.display().to_string();
        if metadata.len() == 0 {
            return Err(PdfSmithError::corrupted_pdf(name, "File is empty"));
        }

        let accepted = kind.accepted_extensions();
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase());
        if !extension.is_some_and(|ext| accepted.contains(&ext.as_str())) {
            return Err(PdfSmithError::UnsupportedInput {
                name,
                expected: accepted.join(", "),
            });
        }

        Ok(())
    }

    /// Check several paths, stopping at the first failure.
    pub async fn validate_paths<P: AsRef<Path>>(
        &self,
        paths: &[P],
        kind: OperationKind,
    ) -> Result<()> {
        if paths.is_empty() {
            return Err(PdfSmithError::NoFilesSelected);
        }
        for path in paths {
            self.validate_path(path.as_ref(), kind).await?;
        }
        Ok(())
    }

    /// Decode `input` and describe it.
    ///
    /// # Errors
    ///
    /// Any error [`PdfReader::read`] reports.
    pub fn inspect(&self, input: &InputFile) -> Result<DocumentSummary> {
        let source = self.reader.read(input)?;
        let page_count = source.page_count();

        let page_dimensions = if page_count > 0 {
            source.page_dimensions(1).ok()
        } else {
            None
        };

        debug!(name = input.name(), pages = page_count, "Document inspected");

        Ok(DocumentSummary {
            name: source.name().to_string(),
            page_count,
            version: source.version().to_string(),
            file_size: source.file_size(),
            page_dimensions,
            object_count: source.object_count(),
            choices: PageSelection::choices(page_count).collect(),
        })
    }
}
