//! pdfsmith - Small PDF transformations on uploaded files.
//!
//! This library turns uploaded buffers into new PDF documents. It supports:
//!
//! - Merging several PDFs in order
//! - Extracting or deleting chosen pages
//! - Converting PNG and JPEG images to a PDF, one page per image
//! - Locking a PDF with a password
//!
//! Every operation is independent: one [`request::Request`] in, one
//! [`ops::Artifact`] out, nothing shared between calls.
//!
//! # Examples
//!
//! ## Extracting pages
//!
//! ```no_run
//! use pdfsmith::config::WriteOptions;
//! use pdfsmith::ops;
//! use pdfsmith::request::{ExtractRequest, InputFile, Request};
//! use pdfsmith::selection::PageSelection;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let file = InputFile::from_path(Path::new("report.pdf")).await?;
//! let request = Request::Extract(ExtractRequest {
//!     file,
//!     selection: PageSelection::parse("4,1")?,
//! });
//!
//! let artifact = ops::execute_blocking(request, WriteOptions::default()).await?;
//! println!("{} has {} pages", artifact.file_name, artifact.statistics.page_count);
//! # Ok(())
//! # }
//! ```
//!
//! ## Using individual components
//!
//! ```no_run
//! use pdfsmith::config::WriteOptions;
//! use pdfsmith::io::{PdfWriter, load_inputs};
//! use pdfsmith::ops::{Merger, Operation};
//! use pdfsmith::request::MergeRequest;
//! use std::path::{Path, PathBuf};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let files = load_inputs(&[PathBuf::from("a.pdf"), PathBuf::from("b.pdf")], 2).await?;
//! let artifact = Merger::new().execute(&MergeRequest { files }, &WriteOptions::default())?;
//!
//! let stats = PdfWriter::new().save(&artifact, Path::new(".")).await?;
//! println!("Wrote {}", stats.output_path.display());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod io;
pub mod ops;
pub mod output;
pub mod request;
pub mod selection;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{PdfSmithError, Result};
pub use ops::{Artifact, OperationKind};
pub use request::{Credential, InputFile, Request};
pub use selection::PageSelection;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
