//! Persisting generated documents.
//!
//! The engine hands back an in-memory byte buffer; hosts that want the file on
//! disk use [`PdfWriter`], which provides:
//! - Atomic writes (write to temp file, then rename)
//! - Download filename resolution from [`GenerationSettings`]
//! - Write statistics
//!
//! # Examples
//!
//! ```no_run
//! use img2pdf::io::writer::PdfWriter;
//! use img2pdf::config::GenerationSettings;
//! use std::path::Path;
//!
//! # async fn example(bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = PdfWriter::new();
//! let stats = writer
//!     .save_to_dir(&bytes, Path::new("downloads"), &GenerationSettings::default())
//!     .await?;
//! println!("Saved {}", stats.output_path.display());
//! # Ok(())
//! # }
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;
use tracing::debug;

use crate::config::GenerationSettings;
use crate::error::{Img2PdfError, Result};
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

/// Writer for generated PDF buffers.
///
/// Writes always go to a sibling temp file first and are renamed into place,
/// so a reader never sees a half-written document.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfWriter;

impl PdfWriter {
    /// Create a new PDF writer.
    pub fn new() -> Self {
        Self
    }

    /// Save a generated document into `dir` under its download filename.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is not writable or the write fails.
    pub async fn save_to_dir(
        &self,
        bytes: &[u8],
        dir: &Path,
        settings: &GenerationSettings,
    ) -> Result<WriteStatistics> {
        let path = dir.join(settings.download_filename());
        self.can_write(&path).await?;
        self.save(bytes, &path).await
    }

    /// Save a generated document to `path`.
    ///
    /// The write runs on a blocking worker so it never stalls the runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be created
    /// - Writing or flushing fails
    /// - The atomic rename fails
    pub async fn save(&self, bytes: &[u8], path: &Path) -> Result<WriteStatistics> {
        let path_buf = path.to_path_buf();
        let bytes = bytes.to_vec();

        let stats = task::spawn_blocking(move || {
            let start = Instant::now();
            let temp_path = path_buf.with_extension("tmp");

            let mut file =
                std::fs::File::create(&temp_path).map_err(|e| Img2PdfError::FailedToWrite {
                    path: temp_path.clone(),
                    source: e,
                })?;

            file.write_all(&bytes)
                .and_then(|_| file.sync_all())
                .map_err(|e| Img2PdfError::FailedToWrite {
                    path: temp_path.clone(),
                    source: e,
                })?;

            std::fs::rename(&temp_path, &path_buf).map_err(|e| Img2PdfError::FailedToWrite {
                path: path_buf.clone(),
                source: e,
            })?;

            Ok::<_, Img2PdfError>(WriteStatistics {
                write_time: start.elapsed(),
                file_size: bytes.len() as u64,
                output_path: path_buf,
            })
        })
        .await
        .map_err(|e| Img2PdfError::Io(std::io::Error::other(format!("Write task failed: {e}"))))??;

        debug!(
            path = %stats.output_path.display(),
            size = %stats.format_file_size(),
            "Wrote PDF"
        );

        Ok(stats)
    }

    /// Check if a file can be written to the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory is missing or read-only.
    pub async fn can_write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            let metadata =
                tokio::fs::metadata(parent)
                    .await
                    .map_err(|e| Img2PdfError::FailedToWrite {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;

            if !metadata.is_dir() || metadata.permissions().readonly() {
                return Err(Img2PdfError::invalid_settings(format!(
                    "Output directory is not writable: {}",
                    parent.display()
                )));
            }
        }

        Ok(())
    }
}
