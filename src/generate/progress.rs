//! Progress reporting and cancellation.
//!
//! A run reports to a [`ProgressSink`] supplied by the caller. Any
//! `Fn(f64)` closure is a sink, and so is an unbounded channel sender for
//! hosts that consume progress on another task.
//!
//! # Examples
//!
//! ```
//! use img2pdf::generate::progress::{CancelFlag, ProgressSink};
//!
//! let sink = |fraction: f64| println!("{:.0}%", fraction * 100.0);
//! sink.on_progress(0.5);
//!
//! let cancel = CancelFlag::new();
//! let handle = cancel.clone();
//! handle.cancel();
//! assert!(cancel.is_cancelled());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc::UnboundedSender;

use crate::error::DecodeError;

/// Receiver of progress signals for one run.
///
/// Calls arrive on the task driving the run, in order. Implementations
/// should return quickly; throttling is up to the sink.
pub trait ProgressSink: Send + Sync {
    /// A run over `total` entries has passed its precondition checks.
    fn on_run_start(&self, _total: usize) {}

    /// Fraction of entries processed, in `(0.0, 1.0]`.
    ///
    /// Values never decrease within a run. `1.0` is only reported once the
    /// document has been produced.
    fn on_progress(&self, fraction: f64);

    /// The entry at `index` could not be decoded and was left out.
    fn on_entry_skipped(&self, _index: usize, _entry_id: &str, _error: &DecodeError) {}
}

impl<F> ProgressSink for F
where
    F: Fn(f64) + Send + Sync,
{
    fn on_progress(&self, fraction: f64) {
        self(fraction)
    }
}

impl ProgressSink for UnboundedSender<f64> {
    fn on_progress(&self, fraction: f64) {
        // A dropped receiver only means nobody is watching.
        let _ = self.send(fraction);
    }
}

/// Sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _fraction: f64) {}
}

/// Cooperative cancellation for a run.
///
/// Clones share the same flag. The orchestrator checks it after every
/// entry, so at most one more entry is processed once it is set.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a flag that is not set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
