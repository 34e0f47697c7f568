//! Input and output for PDF documents.
//!
//! - [`reader`] decodes uploaded buffers
//! - [`document`] assembles output documents
//! - [`writer`] saves finished artifacts to disk

pub mod document;
pub mod reader;
pub mod writer;

use std::path::PathBuf;

use futures::stream::{self, StreamExt};

pub use document::DocumentWriter;
pub use reader::{PdfReader, SourceDocument};
pub use writer::{PdfWriter, WriteStatistics};

use crate::error::Result;
use crate::request::InputFile;

/// Read files from disk with at most `jobs` reads in flight.
///
/// Results keep the order of `paths`. The first failing read aborts the batch.
pub async fn load_inputs(paths: &[PathBuf], jobs: usize) -> Result<Vec<InputFile>> {
    let reads = paths
        .iter()
        .map(|path| async move { InputFile::from_path(path).await });

    stream::iter(reads)
        .buffered(jobs.max(1))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect()
}
