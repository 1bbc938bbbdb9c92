//! Generation runs.
//!
//! A [`Generator`] turns an ordered snapshot of image entries into one PDF.
//! Each entry is decoded, laid out and appended as a page, in input order.
//! Entries that fail to decode are skipped and reported; the run only fails
//! as a whole when nothing could be decoded, when it is cancelled, or when
//! the document itself cannot be produced.
//!
//! Decoding runs on a blocking worker one entry ahead of page encoding, so
//! the decode of entry n+1 overlaps the encode of entry n.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::{self, JoinHandle};
use tracing::{debug, info, warn};

use crate::assemble::{DocumentAssembler, DocumentInfo};
use crate::config::GenerationSettings;
use crate::entry::ImageEntry;
use crate::error::{DecodeError, Img2PdfError, Result};
use crate::generate::progress::{CancelFlag, ProgressSink};
use crate::generate::report::{GeneratedPdf, GenerationReport, SkippedEntry};
use crate::io::decoder::{DecodedImage, ImageDecoder};
use crate::layout::resolve_page;

/// Lifecycle of the most recent run on a generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// No run has started yet.
    #[default]
    Idle,
    /// A run is in progress.
    Running,
    /// The last run produced a document.
    Completed,
    /// The last run ended without a document.
    Failed,
}

/// Drives generation runs, one at a time.
#[derive(Debug, Default)]
pub struct Generator {
    state: Mutex<RunState>,
}

/// Marks the generator as running until dropped.
struct RunGuard<'a> {
    state: &'a Mutex<RunState>,
    outcome: RunState,
}

impl RunGuard<'_> {
    fn complete(mut self) {
        self.outcome = RunState::Completed;
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = self.outcome;
    }
}

impl Generator {
    /// Create an idle generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// State of the current or most recent run.
    pub fn state(&self) -> RunState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin_run(&self) -> Result<RunGuard<'_>> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == RunState::Running {
            return Err(Img2PdfError::Busy);
        }
        *state = RunState::Running;

        Ok(RunGuard {
            state: &self.state,
            outcome: RunState::Failed,
        })
    }

    /// Generate one PDF from `entries`, in order.
    ///
    /// Progress is reported to `progress` after every entry. `cancel` is
    /// checked after every entry; once set, the run stops without producing
    /// a document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `entries` is empty, has duplicate ids, or `settings` are invalid
    ///   (the run never starts)
    /// - Another run on this generator is in progress
    /// - The run was cancelled
    /// - No entry could be decoded
    /// - The document could not be serialized
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use img2pdf::config::GenerationSettings;
    /// use img2pdf::entry::ImageEntry;
    /// use img2pdf::generate::{CancelFlag, Generator, NoProgress};
    ///
    /// # async fn example(png: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
    /// let entries = vec![ImageEntry::new("1", "photo.png", png)];
    /// let generator = Generator::new();
    /// let pdf = generator
    ///     .generate(&entries, &GenerationSettings::default(), &NoProgress, &CancelFlag::new())
    ///     .await?;
    /// println!("{}", pdf.report.summary());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn generate(
        &self,
        entries: &[ImageEntry],
        settings: &GenerationSettings,
        progress: &dyn ProgressSink,
        cancel: &CancelFlag,
    ) -> Result<GeneratedPdf> {
        let decoder = ImageDecoder::new(settings.quality_tier);
        self.generate_with(entries, settings, progress, cancel, move |bytes| {
            decoder.decode(bytes)
        })
        .await
    }

    async fn generate_with<D>(
        &self,
        entries: &[ImageEntry],
        settings: &GenerationSettings,
        progress: &dyn ProgressSink,
        cancel: &CancelFlag,
        decode: D,
    ) -> Result<GeneratedPdf>
    where
        D: Fn(&[u8]) -> DecodeResult + Send + 'static,
    {
        check_preconditions(entries, settings)?;

        let guard = self.begin_run()?;
        let pdf = run(entries, settings, progress, cancel, decode).await?;
        guard.complete();

        Ok(pdf)
    }
}

fn check_preconditions(entries: &[ImageEntry], settings: &GenerationSettings) -> Result<()> {
    if entries.is_empty() {
        return Err(Img2PdfError::EmptyDocument);
    }

    let mut ids = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !ids.insert(entry.id.as_str()) {
            return Err(Img2PdfError::DuplicateEntryId {
                id: entry.id.clone(),
            });
        }
    }

    settings.validate()
}

async fn run<D>(
    entries: &[ImageEntry],
    settings: &GenerationSettings,
    progress: &dyn ProgressSink,
    cancel: &CancelFlag,
    decode: D,
) -> Result<GeneratedPdf>
where
    D: Fn(&[u8]) -> DecodeResult + Send + 'static,
{
    let start = Instant::now();
    let total = entries.len();
    let page_options = settings.page_options();

    info!(
        entries = total,
        orientation = %settings.global_orientation,
        quality = ?settings.quality_tier,
        "Starting PDF generation"
    );
    progress.on_run_start(total);

    let (mut decoded, worker) = spawn_decoder(entries, decode, cancel);
    let mut assembler = DocumentAssembler::new(DocumentInfo::for_settings(settings));
    let mut skipped = Vec::new();
    let mut processed = 0;

    while let Some((index, result)) = decoded.recv().await {
        let entry = &entries[index];

        match result {
            Ok(image) => {
                let orientation = entry.effective_orientation(settings.global_orientation);
                let page = resolve_page(
                    image.source_width,
                    image.source_height,
                    orientation,
                    &page_options,
                );
                assembler.append_page(&page, image)?;
                debug!(index, id = %entry.id, %orientation, "Appended page");
            }
            Err(error) => {
                warn!(
                    index,
                    id = %entry.id,
                    name = %entry.display_name,
                    %error,
                    "Skipping image"
                );
                progress.on_entry_skipped(index, &entry.id, &error);
                skipped.push(SkippedEntry {
                    index,
                    id: entry.id.clone(),
                    display_name: entry.display_name.clone(),
                    error,
                });
            }
        }

        processed += 1;
        if processed < total {
            progress.on_progress(processed as f64 / total as f64);
        }

        if cancel.is_cancelled() {
            break;
        }
    }

    // The worker only stops short on its own when it dies.
    if processed < total && !cancel.is_cancelled() {
        let reason = match worker.await {
            Err(e) => format!("Decoder worker failed: {e}"),
            Ok(()) => format!("Decoder worker stopped after {processed} of {total} image(s)"),
        };
        return Err(Img2PdfError::encoding(reason));
    }

    if cancel.is_cancelled() {
        info!(completed = processed, total, "PDF generation cancelled");
        return Err(Img2PdfError::Cancelled {
            completed: processed,
            total,
        });
    }

    if assembler.page_count() == 0 {
        let first_error = skipped
            .into_iter()
            .next()
            .map(|s| s.error)
            .unwrap_or(DecodeError::Empty);
        return Err(Img2PdfError::AllEntriesFailed { total, first_error });
    }

    let pages_written = assembler.page_count();
    let bytes = task::spawn_blocking(move || assembler.finalize())
        .await
        .map_err(|e| Img2PdfError::encoding(format!("Finalize task failed: {e}")))??;

    let report = GenerationReport {
        total_entries: total,
        pages_written,
        skipped,
        elapsed: start.elapsed(),
        output_size: bytes.len() as u64,
    };
    progress.on_progress(1.0);

    info!(
        pages = report.pages_written,
        skipped = report.skipped.len(),
        size = %report.format_output_size(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "PDF generation completed"
    );

    Ok(GeneratedPdf { bytes, report })
}

type DecodeResult = std::result::Result<DecodedImage, DecodeError>;

/// Decode entries in order on a blocking worker, one ahead of the consumer.
///
/// The worker stops early when the run is cancelled or the receiver is
/// dropped.
fn spawn_decoder<D>(
    entries: &[ImageEntry],
    decode: D,
    cancel: &CancelFlag,
) -> (mpsc::Receiver<(usize, DecodeResult)>, JoinHandle<()>)
where
    D: Fn(&[u8]) -> DecodeResult + Send + 'static,
{
    let (tx, rx) = mpsc::channel(1);
    let entries = entries.to_vec();
    let cancel = cancel.clone();

    let worker = task::spawn_blocking(move || {
        for (index, entry) in entries.iter().enumerate() {
            if cancel.is_cancelled() {
                break;
            }

            let result = decode(&entry.bytes);
            if tx.blocking_send((index, result)).is_err() {
                break;
            }
        }
    });

    (rx, worker)
}
