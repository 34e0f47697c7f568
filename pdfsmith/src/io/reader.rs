//! Decoding uploaded buffers into PDF documents.
//!
//! Decoding is synchronous; async callers run it on a blocking thread via
//! [`crate::ops::execute_blocking`].
//!
//! # Examples
//!
//! ```no_run
//! use pdfsmith::io::PdfReader;
//! use pdfsmith::request::InputFile;
//!
//! # fn example(bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let source = reader.read(&InputFile::new("report.pdf", bytes))?;
//! println!("{} has {} pages", source.name(), source.page_count());
//! # Ok(())
//! # }
//! ```

use std::time::{Duration, Instant};

use lopdf::{Document, Object, ObjectId};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use crate::error::{PdfSmithError, Result};
use crate::request::InputFile;

/// Page size used when a page tree carries no MediaBox at all (US Letter).
pub(crate) const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// A decoded source PDF with its page order resolved.
#[derive(Debug)]
pub struct SourceDocument {
    name: String,
    document: Document,
    page_ids: Vec<ObjectId>,
    fingerprint: [u8; 32],
    file_size: u64,
    load_time: Duration,
}

impl SourceDocument {
    /// Display name of the upload this document came from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying lopdf document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Page object ids in document order.
    pub fn page_ids(&self) -> &[ObjectId] {
        &self.page_ids
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.page_ids.len() as u32
    }

    /// Object id of the 1-based page `number`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfSmithError::PageOutOfRange`] if the page does not exist.
    pub fn page_id(&self, number: u32) -> Result<ObjectId> {
        number
            .checked_sub(1)
            .and_then(|index| self.page_ids.get(index as usize))
            .copied()
            .ok_or(PdfSmithError::PageOutOfRange {
                page: number,
                total: self.page_count(),
            })
    }

    /// SHA-256 of the uploaded bytes.
    pub fn fingerprint(&self) -> &[u8; 32] {
        &self.fingerprint
    }

    /// Size of the upload in bytes.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Time spent decoding.
    pub fn load_time(&self) -> Duration {
        self.load_time
    }

    /// PDF header version, e.g. "1.7".
    pub fn version(&self) -> &str {
        &self.document.version
    }

    /// Number of indirect objects in the document.
    pub fn object_count(&self) -> usize {
        self.document.objects.len()
    }

    /// Width and height in points of the 1-based page `number`.
    ///
    /// Follows the page tree for an inherited MediaBox and falls back to US
    /// Letter when none is present.
    pub fn page_dimensions(&self, number: u32) -> Result<(f32, f32)> {
        let page_id = self.page_id(number)?;
        let page = self
            .document
            .get_dictionary(page_id)
            .map_err(|e| PdfSmithError::corrupted_pdf(&self.name, e.to_string()))?;

        let media_box = inherited_attribute(&self.document, page, b"MediaBox")
            .and_then(|value| resolve(&self.document, value).as_array().ok())
            .and_then(|values| {
                let numbers: Vec<f32> = values
                    .iter()
                    .filter_map(|v| resolve(&self.document, v).as_float().ok())
                    .collect();
                <[f32; 4]>::try_from(numbers).ok()
            })
            .unwrap_or(DEFAULT_MEDIA_BOX);

        Ok((
            (media_box[2] - media_box[0]).abs(),
            (media_box[3] - media_box[1]).abs(),
        ))
    }
}

/// PDF reader with configurable verification.
#[derive(Debug, Clone, Copy)]
pub struct PdfReader {
    /// Reject documents without pages.
    verify: bool,
}

impl PdfReader {
    /// Create a reader that rejects page-less documents.
    pub fn new() -> Self {
        Self { verify: true }
    }

    /// Create a reader that accepts any parseable document.
    pub fn without_verification() -> Self {
        Self { verify: false }
    }

    /// Decode an uploaded buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The bytes are not a PDF ([`PdfSmithError::FailedToLoadPdf`])
    /// - The PDF needs a password to open ([`PdfSmithError::EncryptedPdf`])
    /// - Verification is on and the page tree is empty
    ///   ([`PdfSmithError::CorruptedPdf`])
    #[instrument(skip_all, fields(name = input.name(), bytes = input.len()))]
    pub fn read(&self, input: &InputFile) -> Result<SourceDocument> {
        let start = Instant::now();

        let document = Document::load_mem(input.bytes()).map_err(|e| {
            let err_msg = e.to_string();
            if err_msg.contains("encrypt")
                || err_msg.contains("password")
                || err_msg.contains("decrypt")
            {
                PdfSmithError::encrypted_pdf(input.name())
            } else {
                PdfSmithError::failed_to_load_pdf(input.name(), err_msg)
            }
        })?;

        // Files with an empty user password come back already decrypted and
        // carry their encryption state; any other locked file has no objects.
        if document.is_encrypted() && document.encryption_state.is_none() {
            return Err(PdfSmithError::encrypted_pdf(input.name()));
        }

        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();

        if self.verify && page_ids.is_empty() {
            return Err(PdfSmithError::corrupted_pdf(
                input.name(),
                "PDF has no pages",
            ));
        }

        let fingerprint: [u8; 32] = Sha256::digest(input.bytes()).into();
        let load_time = start.elapsed();

        debug!(
            pages = page_ids.len(),
            objects = document.objects.len(),
            ?load_time,
            "PDF decoded"
        );

        Ok(SourceDocument {
            name: input.name().to_string(),
            document,
            page_ids,
            fingerprint,
            file_size: input.len() as u64,
            load_time,
        })
    }

    /// Decode several uploads, stopping at the first failure.
    pub fn read_all(&self, inputs: &[InputFile]) -> Result<Vec<SourceDocument>> {
        inputs.iter().map(|input| self.read(input)).collect()
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Look up an attribute on a page, walking up the page tree if the page
/// itself does not define it.
pub(crate) fn inherited_attribute<'a>(
    document: &'a Document,
    page: &'a lopdf::Dictionary,
    key: &[u8],
) -> Option<&'a Object> {
    // Guards against Parent cycles in malformed files.
    const MAX_DEPTH: usize = 64;

    let mut node = page;
    for _ in 0..MAX_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = document.get_dictionary(parent).ok()?;
    }
    None
}

/// Follow a reference to its target, or return the object itself.
fn resolve<'a>(document: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => document.get_object(*id).unwrap_or(object),
        _ => object,
    }
}
