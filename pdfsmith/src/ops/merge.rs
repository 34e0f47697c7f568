//! Merging PDFs.
//!
//! All pages of every input are copied, file by file, in the order the files
//! were supplied.

use tracing::{debug, instrument};

use crate::config::WriteOptions;
use crate::error::{PdfSmithError, Result};
use crate::io::{DocumentWriter, PdfReader};
use crate::ops::{Artifact, Operation, OperationKind, OperationStatistics, timed};
use crate::request::MergeRequest;
use crate::selection::PageSelection;

/// Concatenates PDFs.
#[derive(Debug, Clone, Default)]
pub struct Merger {
    reader: PdfReader,
}

impl Merger {
    /// Create a new merger with default settings.
    pub fn new() -> Self {
        Self {
            reader: PdfReader::new(),
        }
    }
}

impl Operation for Merger {
    const KIND: OperationKind = OperationKind::Merge;
    type Request = MergeRequest;

    #[instrument(name = "merge", skip_all, fields(files = request.files.len()))]
    fn execute(&self, request: &MergeRequest, options: &WriteOptions) -> Result<Artifact> {
        if request.files.is_empty() {
            return Err(PdfSmithError::NoFilesSelected);
        }

        timed(|| {
            let mut writer = DocumentWriter::new();
            let mut input_size = 0;

            for file in &request.files {
                let source = self.reader.read(file)?;
                let pages: Vec<u32> = PageSelection::choices(source.page_count()).collect();
                writer.append_pages(&source, &pages)?;
                input_size += source.file_size();

                debug!(file = source.name(), pages = pages.len(), "File merged");
            }

            let statistics = OperationStatistics {
                files_processed: request.files.len(),
                input_size,
                page_count: writer.page_count(),
                ..Default::default()
            };
            let bytes = writer.finish(options, None)?;
            Ok(Artifact::new(Self::KIND, bytes, statistics))
        })
    }
}
