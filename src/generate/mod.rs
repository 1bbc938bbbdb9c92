//! Image-to-PDF generation.
//!
//! This module ties decoding, layout and assembly together:
//! - [`orchestrator`]: the [`Generator`] state machine and run loop
//! - [`progress`]: progress sinks and cancellation
//! - [`report`]: the outcome of a run

pub mod orchestrator;
pub mod progress;
pub mod report;

pub use orchestrator::{Generator, RunState};
pub use progress::{CancelFlag, NoProgress, ProgressSink};
pub use report::{GeneratedPdf, GenerationReport, SkippedEntry};

use crate::config::GenerationSettings;
use crate::entry::ImageEntry;
use crate::error::Result;

/// Generate a PDF with a fresh generator and no cancellation.
///
/// # Errors
///
/// See [`Generator::generate`].
pub async fn generate_pdf(
    entries: &[ImageEntry],
    settings: &GenerationSettings,
    progress: &dyn ProgressSink,
) -> Result<GeneratedPdf> {
    Generator::new()
        .generate(entries, settings, progress, &CancelFlag::new())
        .await
}
