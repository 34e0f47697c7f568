//! Saving artifacts to disk.
//!
//! Documents are built entirely in memory; this module only moves the
//! finished bytes to the filesystem. Writes are atomic by default: the bytes
//! land in a sibling temp file which is then renamed over the target.
//!
//! # Examples
//!
//! ```no_run
//! use pdfsmith::io::PdfWriter;
//! use pdfsmith::ops::Artifact;
//! use std::path::Path;
//!
//! # async fn example(artifact: Artifact) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = PdfWriter::new();
//! let stats = writer.save(&artifact, Path::new("out")).await?;
//! println!("Wrote {}", stats.format_file_size());
//! # Ok(())
//! # }
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio::task;
use tracing::debug;

use crate::error::{PdfSmithError, Result};
use crate::ops::Artifact;
use crate::utils::format_file_size;

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Writes artifact bytes to the filesystem.
#[derive(Debug, Clone)]
pub struct PdfWriter {
    atomic: bool,
    buffer_size: usize,
}

impl PdfWriter {
    /// Create a writer with atomic writes.
    pub fn new() -> Self {
        Self {
            atomic: true,
            buffer_size: 8192,
        }
    }

    /// Create a writer that writes straight to the target path.
    pub fn non_atomic() -> Self {
        Self {
            atomic: false,
            ..Self::new()
        }
    }

    /// Save `artifact` into `dir` under its fixed filename.
    pub async fn save(&self, artifact: &Artifact, dir: &Path) -> Result<WriteStatistics> {
        self.save_with_stats(&artifact.bytes, &dir.join(&artifact.file_name))
            .await
    }

    /// Write `bytes` to `path` and report statistics.
    ///
    /// # Errors
    ///
    /// Returns [`PdfSmithError::FailedToWrite`] if the file cannot be
    /// created, written or renamed into place.
    pub async fn save_with_stats(&self, bytes: &[u8], path: &Path) -> Result<WriteStatistics> {
        let path_buf = path.to_path_buf();
        let bytes = bytes.to_vec();
        let options = self.clone();

        let stats = task::spawn_blocking(move || {
            let start = Instant::now();

            let write_path = if options.atomic {
                path_buf.with_extension("pdf.tmp")
            } else {
                path_buf.clone()
            };

            let file = std::fs::File::create(&write_path).map_err(|e| {
                PdfSmithError::FailedToWrite {
                    path: write_path.clone(),
                    source: e,
                }
            })?;

            let mut writer = std::io::BufWriter::with_capacity(options.buffer_size, file);
            writer
                .write_all(&bytes)
                .and_then(|()| writer.flush())
                .map_err(|e| PdfSmithError::FailedToWrite {
                    path: write_path.clone(),
                    source: e,
                })?;
            drop(writer);

            if options.atomic {
                std::fs::rename(&write_path, &path_buf).map_err(|e| {
                    let _ = std::fs::remove_file(&write_path);
                    PdfSmithError::FailedToWrite {
                        path: path_buf.clone(),
                        source: e,
                    }
                })?;
            }

            Ok::<_, PdfSmithError>(WriteStatistics {
                write_time: start.elapsed(),
                file_size: bytes.len() as u64,
                output_path: path_buf,
            })
        })
        .await
        .map_err(|e| PdfSmithError::other(format!("Write task failed: {e}")))??;

        debug!(
            path = %stats.output_path.display(),
            bytes = stats.file_size,
            "Artifact written"
        );
        Ok(stats)
    }

    /// Check that a file could be written to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory doesn't exist
    /// - Parent directory is not writable
    pub async fn can_write(&self, path: &Path) -> Result<()> {
        let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };

        let metadata = tokio::fs::metadata(parent).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PdfSmithError::invalid_config(format!(
                    "Output directory does not exist: {}",
                    parent.display()
                ))
            } else {
                PdfSmithError::FileNotAccessible {
                    path: parent.to_path_buf(),
                    source: e,
                }
            }
        })?;

        if !metadata.is_dir() {
            return Err(PdfSmithError::invalid_config(format!(
                "Output path is not a directory: {}",
                parent.display()
            )));
        }

        if metadata.permissions().readonly() {
            return Err(PdfSmithError::invalid_config(format!(
                "Output directory is not writable: {}",
                parent.display()
            )));
        }

        Ok(())
    }

    /// Check if a file exists at `path`.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}
