//! Deleting pages.

use tracing::{debug, instrument};

use crate::config::WriteOptions;
use crate::error::{PdfSmithError, Result};
use crate::io::{DocumentWriter, PdfReader};
use crate::ops::{Artifact, Operation, OperationKind, OperationStatistics, timed};
use crate::request::DeleteRequest;
use crate::selection::PageSelection;

/// Drops the selected pages and keeps the rest in their original order.
#[derive(Debug, Clone, Default)]
pub struct PageRemover {
    reader: PdfReader,
}

impl PageRemover {
    /// Create a new page remover.
    pub fn new() -> Self {
        Self {
            reader: PdfReader::new(),
        }
    }
}

impl Operation for PageRemover {
    const KIND: OperationKind = OperationKind::Delete;
    type Request = DeleteRequest;

    /// # Errors
    ///
    /// - [`PdfSmithError::NoPagesChosen`] for an empty selection
    /// - [`PdfSmithError::PageOutOfRange`] for pages the source does not have
    /// - [`PdfSmithError::AllPagesDeleted`] if nothing would be left
    #[instrument(name = "delete", skip_all, fields(file = request.file.name(), selected = request.selection.len()))]
    fn execute(&self, request: &DeleteRequest, options: &WriteOptions) -> Result<Artifact> {
        if request.selection.is_empty() {
            return Err(PdfSmithError::NoPagesChosen);
        }

        timed(|| {
            let source = self.reader.read(&request.file)?;
            let total = source.page_count();
            request.selection.resolve(total)?;

            let kept: Vec<u32> = PageSelection::choices(total)
                .filter(|&page| !request.selection.contains(page))
                .collect();
            if kept.is_empty() {
                return Err(PdfSmithError::AllPagesDeleted { total });
            }

            debug!(kept = kept.len(), removed = total as usize - kept.len(), "Pages kept");

            let mut writer = DocumentWriter::new();
            writer.append_pages(&source, &kept)?;

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
