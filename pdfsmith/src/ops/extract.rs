//! Extracting pages.

use tracing::instrument;

use crate::config::WriteOptions;
use crate::error::{PdfSmithError, Result};
use crate::io::{DocumentWriter, PdfReader};
use crate::ops::{Artifact, Operation, OperationKind, OperationStatistics, timed};
use crate::request::ExtractRequest;

/// Keeps the selected pages, in the order they were selected.
#[derive(Debug, Clone, Default)]
pub struct PageExtractor {
    reader: PdfReader,
}

impl PageExtractor {
    /// Create a new page extractor.
    pub fn new() -> Self {
        Self {
            reader: PdfReader::new(),
        }
    }
}

impl Operation for PageExtractor {
    const KIND: OperationKind = OperationKind::Extract;
    type Request = ExtractRequest;

    /// Copy the selected pages of the source into a new document.
    ///
    /// Selecting `[4, 1]` produces a two-page document with page 4 first.
    ///
    /// # Errors
    ///
    /// Returns [`PdfSmithError::NoPagesChosen`] for an empty selection
    /// and [`PdfSmithError::PageOutOfRange`] for pages the source does
    /// not have.
    #[instrument(name = "extract", skip_all, fields(file = request.file.name(), selected = request.selection.len()))]
    fn execute(&self, request: &ExtractRequest, options: &WriteOptions) -> Result<Artifact> {
        if request.selection.is_empty() {
            return Err(PdfSmithError::NoPagesChosen);
        }

        timed(|| {
            let source = self.reader.read(&request.file)?;
            let pages = request.selection.resolve(source.page_count())?;

            let mut writer = DocumentWriter::new();
            writer.append_pages(&source, pages)?;

            let statistics = OperationStatistics {
                files_processed: 1,
                input_size: source.file_size(),
                page_count: writer.page_count(),
                ..Default::default()
            };
            let bytes = writer.finish(options, None)?;
            Ok(Artifact::new(Self::KIND, bytes, statistics))
        })
    }
}
