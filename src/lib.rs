//! img2pdf - Assemble ordered images into a single PDF document.
//!
//! This library turns a sequence of raster images (JPEG, PNG, WebP) into one
//! PDF entirely in memory, one page per image. It supports:
//!
//! - Per-image and global page orientation (auto, portrait, landscape)
//! - Quality tiers trading file size for fidelity
//! - Progress reporting and cooperative cancellation
//! - Skip-and-continue handling of unreadable images
//! - Deterministic output for identical input
//!
//! # Examples
//!
//! ## Generate a PDF
//!
//! ```no_run
//! use img2pdf::config::GenerationSettings;
//! use img2pdf::entry::ImageEntry;
//! use img2pdf::generate::{CancelFlag, Generator};
//!
//! # async fn example(front: Vec<u8>, back: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let entries = vec![
//!     ImageEntry::new("1", "front.jpg", front),
//!     ImageEntry::new("2", "back.png", back),
//! ];
//! let settings = GenerationSettings::from_json(r#"{"filename": "scans", "quality": "medium"}"#)?;
//!
//! let generator = Generator::new();
//! let progress = |fraction: f64| println!("{:.0}%", fraction * 100.0);
//! let pdf = generator
//!     .generate(&entries, &settings, &progress, &CancelFlag::new())
//!     .await?;
//!
//! println!("{} -> {}", settings.download_filename(), pdf.report.summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Save the Result
//!
//! ```no_run
//! use img2pdf::config::GenerationSettings;
//! use img2pdf::io::PdfWriter;
//! use img2pdf::validation::inspect_pdf;
//! use std::path::Path;
//!
//! # async fn example(bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let summary = inspect_pdf(&bytes)?;
//! println!("PDF has {} pages", summary.page_count);
//!
//! let writer = PdfWriter::new();
//! writer
//!     .save_to_dir(&bytes, Path::new("."), &GenerationSettings::default())
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assemble;
pub mod config;
pub mod entry;
pub mod error;
pub mod generate;
pub mod io;
pub mod layout;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use config::{GenerationSettings, Orientation, QualityTier};
pub use entry::ImageEntry;
pub use error::{DecodeError, Img2PdfError, Result};
pub use generate::{CancelFlag, GeneratedPdf, Generator, ProgressSink, generate_pdf};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
