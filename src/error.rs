//! Error types for img2pdf.
//!
//! Two error types reflect the two failure scopes of a generation run:
//!
//! - [`DecodeError`]: a single image could not be decoded or re-encoded. These
//!   are recoverable; the entry is skipped and recorded in the run report.
//! - [`Img2PdfError`]: the run as a whole failed (empty input, busy
//!   generator, cancellation, unusable output). Returned as `Err` from the
//!   generation entry points.

use serde::Serialize;
use std::io;
use std::path::PathBuf;

/// Result type alias for img2pdf operations.
pub type Result<T> = std::result::Result<T, Img2PdfError>;

/// Failure to turn one image entry into an embeddable raster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DecodeError {
    /// The entry holds no bytes at all.
    #[error("Image data is empty")]
    Empty,

    /// The bytes are not in a supported raster format (JPEG, PNG, WebP).
    #[error("Unsupported image format: {details}")]
    UnsupportedFormat {
        /// What the decoder reported.
        details: String,
    },

    /// The bytes look like a supported format but are truncated or corrupt.
    #[error("Corrupted or truncated image: {details}")]
    Corrupt {
        /// What the decoder reported.
        details: String,
    },

    /// The image is too large to decode within the decoder's memory limits.
    #[error("Image is too large to process: {details}")]
    TooLarge {
        /// What the decoder reported.
        details: String,
    },

    /// The image decoded to a zero-sized raster.
    #[error("Image has invalid dimensions {width}x{height}")]
    ZeroDimensions {
        /// Decoded width in pixels.
        width: u32,
        /// Decoded height in pixels.
        height: u32,
    },

    /// The decoded raster could not be re-encoded for embedding.
    #[error("Failed to re-encode image: {details}")]
    Reencode {
        /// What the encoder reported.
        details: String,
    },
}

impl From<image::ImageError> for DecodeError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Unsupported(e) => Self::UnsupportedFormat {
                details: e.to_string(),
            },
            image::ImageError::Limits(e) => Self::TooLarge {
                details: e.to_string(),
            },
            other => Self::Corrupt {
                details: other.to_string(),
            },
        }
    }
}

/// Run-level error for img2pdf operations.
#[derive(Debug, thiserror::Error)]
pub enum Img2PdfError {
    /// No pages to put into a document. Raised for an empty input sequence
    /// and when an assembler with zero pages is finalized.
    #[error("No images to convert")]
    EmptyDocument,

    /// A run was requested while another run on the same generator is active.
    #[error("A PDF is already being generated")]
    Busy,

    /// The caller cancelled the run between two entries.
    #[error("Generation cancelled after {completed} of {total} image(s)")]
    Cancelled {
        /// Entries processed before the cancellation was observed.
        completed: usize,
        /// Entries in the run.
        total: usize,
    },

    /// The assembler could not produce a structurally valid document.
    #[error("Failed to encode PDF document: {reason}")]
    Encoding {
        /// Description of what went wrong.
        reason: String,
    },

    /// Every entry in the run failed to decode.
    #[error("All {total} image(s) failed to decode\n  First error: {first_error}")]
    AllEntriesFailed {
        /// Entries in the run.
        total: usize,
        /// Error of the first entry.
        first_error: DecodeError,
    },

    /// Two entries in the input share the same identifier.
    #[error("Duplicate image id in input: {id}")]
    DuplicateEntryId {
        /// The repeated identifier.
        id: String,
    },

    /// Settings for the run are unusable.
    #[error("Invalid settings: {message}")]
    InvalidSettings {
        /// Description of what's wrong with the settings.
        message: String,
    },

    /// Failed to persist a generated document.
    #[error("Failed to write output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<lopdf::Error> for Img2PdfError {
    fn from(err: lopdf::Error) -> Self {
        Self::encoding(err.to_string())
    }
}

impl From<serde_json::Error> for Img2PdfError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_settings(err.to_string())
    }
}

impl Img2PdfError {
    /// Create an Encoding error.
    pub fn encoding(reason: impl Into<String>) -> Self {
        Self::Encoding {
            reason: reason.into(),
        }
    }

    /// Create an InvalidSettings error.
    pub fn invalid_settings(message: impl Into<String>) -> Self {
        Self::InvalidSettings {
            message: message.into(),
        }
    }

    /// Check if the caller can reasonably retry the same request.
    ///
    /// Returns true for errors caused by timing rather than by the input.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Busy | Self::Cancelled { .. })
    }

    /// Check if this error indicates a defect rather than bad input.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Encoding { .. } | Self::FailedToWrite { .. } | Self::Io(_)
        )
    }

    /// Short message suitable for a dismissible notification.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyDocument => "Add at least one image to create a PDF.",
            Self::Busy => "A PDF is already being generated. Please wait.",
            Self::Cancelled { .. } => "PDF generation was cancelled.",
            Self::AllEntriesFailed { .. } => {
                "None of the images could be read. Please try different files."
            }
            Self::DuplicateEntryId { .. } | Self::InvalidSettings { .. } => {
                "Failed to generate PDF. Please check your settings."
            }
            Self::Encoding { .. } | Self::FailedToWrite { .. } | Self::Io(_) => {
                "Failed to generate PDF. Please try again."
            }
        }
    }
}
