//! Per-invocation inputs.
//!
//! Each user action is captured as an immutable [`Request`] holding the
//! uploaded buffers and choices for exactly one operation. Handlers receive
//! requests by reference and never see presentation state.

use std::fmt;
use std::path::Path;

use crate::error::{PdfSmithError, Result};
use crate::ops::OperationKind;
use crate::selection::PageSelection;

/// One uploaded file: a display name and its raw bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct InputFile {
    name: String,
    bytes: Vec<u8>,
}

impl InputFile {
    /// Wrap an in-memory buffer.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`PdfSmithError::FileNotFound`] when the path does not exist and
    /// [`PdfSmithError::FileNotAccessible`] for other read failures.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PdfSmithError::file_not_found(path.to_path_buf())
            } else {
                PdfSmithError::FileNotAccessible {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self { name, bytes })
    }

    /// Display name of the file.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-length upload.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lower-cased extension of the name, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }

    /// Check the name against the extensions `kind` accepts.
    pub fn check_extension(&self, kind: OperationKind) -> Result<()> {
        let accepted = kind.accepted_extensions();
        match self.extension() {
            Some(ext) if accepted.contains(&ext.as_str()) => Ok(()),
            _ => Err(PdfSmithError::UnsupportedInput {
                name: self.name.clone(),
                expected: accepted.join(", "),
            }),
        }
    }
}

impl fmt::Debug for InputFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A password used to lock a document.
///
/// Guaranteed non-empty. The secret is only reachable through
/// [`Credential::expose`]; formatting always redacts it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a password.
    ///
    /// # Errors
    ///
    /// Returns [`PdfSmithError::EmptyPassword`] for an empty string.
    pub fn new(password: impl Into<String>) -> Result<Self> {
        let password = password.into();
        if password.is_empty() {
            return Err(PdfSmithError::EmptyPassword);
        }
        Ok(Self(password))
    }

    /// The plain-text password.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Concatenate PDFs in the order given.
#[derive(Debug, Clone)]
pub struct MergeRequest {
    /// Input PDFs, in output order.
    pub files: Vec<InputFile>,
}

/// Keep the selected pages, in selection order.
#[derive(Debug, Clone)]
pub struct ExtractRequest {
    /// Source PDF.
    pub file: InputFile,
    /// Pages to keep.
    pub selection: PageSelection,
}

/// Drop the selected pages, keeping original order.
#[derive(Debug, Clone)]
pub struct DeleteRequest {
    /// Source PDF.
    pub file: InputFile,
    /// Pages to remove.
    pub selection: PageSelection,
}

/// Turn images into a PDF with one page per image.
#[derive(Debug, Clone)]
pub struct ImagesRequest {
    /// PNG or JPEG inputs, in page order.
    pub images: Vec<InputFile>,
}

/// Lock a PDF with a password.
#[derive(Debug, Clone)]
pub struct EncryptRequest {
    /// Source PDF.
    pub file: InputFile,
    /// Password required to open the output.
    pub credential: Credential,
}

/// One user action.
#[derive(Debug, Clone)]
pub enum Request {
    /// See [`MergeRequest`].
    Merge(MergeRequest),
    /// See [`ExtractRequest`].
    Extract(ExtractRequest),
    /// See [`DeleteRequest`].
    Delete(DeleteRequest),
    /// See [`ImagesRequest`].
    Images(ImagesRequest),
    /// See [`EncryptRequest`].
    Encrypt(EncryptRequest),
}

impl Request {
    /// The operation this request targets.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Merge(_) => OperationKind::Merge,
            Self::Extract(_) => OperationKind::Extract,
            Self::Delete(_) => OperationKind::Delete,
            Self::Images(_) => OperationKind::Images,
            Self::Encrypt(_) => OperationKind::Encrypt,
        }
    }

    /// All input files carried by the request.
    pub fn files(&self) -> Vec<&InputFile> {
        match self {
            Self::Merge(r) => r.files.iter().collect(),
            Self::Images(r) => r.images.iter().collect(),
            Self::Extract(r) => vec![&r.file],
            Self::Delete(r) => vec![&r.file],
            Self::Encrypt(r) => vec![&r.file],
        }
    }

    /// Check whether the action may be offered for this request.
    ///
    /// Cheap checks only: files present with accepted extensions, and a
    /// non-empty selection for extract and delete. Page bounds are checked
    /// later against the decoded document.
    pub fn check_preconditions(&self) -> Result<()> {
        let files = self.files();
        if files.is_empty() {
            return Err(PdfSmithError::NoFilesSelected);
        }

        let kind = self.kind();
        for file in files {
            file.check_extension(kind)?;
        }

        match self {
            Self::Extract(ExtractRequest { selection, .. })
            | Self::Delete(DeleteRequest { selection, .. })
                if selection.is_empty() =>
            {
                Err(PdfSmithError::NoPagesChosen)
            }
            _ => Ok(()),
        }
    }
}
