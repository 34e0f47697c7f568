//! Password locking.
//!
//! The credential only ever reaches [`DocumentWriter::finish`]; it is never a
//! tracing field and never leaves process memory.

use tracing::instrument;

use crate::config::WriteOptions;
use crate::error::Result;
use crate::io::{DocumentWriter, PdfReader};
use crate::ops::{Artifact, Operation, OperationKind, OperationStatistics, timed};
use crate::request::EncryptRequest;
use crate::selection::PageSelection;

/// Copies every page and locks the output with a password.
#[derive(Debug, Clone, Default)]
pub struct Locker {
    reader: PdfReader,
}

impl Locker {
    /// Create a new locker.
    pub fn new() -> Self {
        Self {
            reader: PdfReader::new(),
        }
    }
}

impl Operation for Locker {
    const KIND: OperationKind = OperationKind::Encrypt;
    type Request = EncryptRequest;

    #[instrument(name = "encrypt", skip_all, fields(file = request.file.name()))]
    fn execute(&self, request: &EncryptRequest, options: &WriteOptions) -> Result<Artifact> {
        timed(|| {
            let source = self.reader.read(&request.file)?;
            let pages: Vec<u32> = PageSelection::choices(source.page_count()).collect();

            let mut writer = DocumentWriter::new();
            writer.append_pages(&source, &pages)?;

            let statistics = OperationStatistics {
                files_processed: 1,
                input_size: source.file_size(),
                page_count: writer.page_count(),
                ..Default::default()
            };
            let bytes = writer.finish(options, Some(&request.credential))?;
            Ok(Artifact::new(Self::KIND, bytes, statistics))
        })
    }
}
