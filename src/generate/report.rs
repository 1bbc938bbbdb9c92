//! Outcome of a generation run.

use serde::{Serialize, Serializer};
use std::time::Duration;

use crate::error::{DecodeError, Result};
use crate::utils::format_file_size;

/// An entry that was left out of the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedEntry {
    /// Position of the entry in the input sequence.
    pub index: usize,

    /// Identifier of the entry.
    pub id: String,

    /// Name shown to the user.
    pub display_name: String,

    /// Why the entry could not be used.
    pub error: DecodeError,
}

/// Statistics about a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    /// Entries in the input sequence.
    pub total_entries: usize,

    /// Pages in the generated document.
    pub pages_written: usize,

    /// Entries left out, in input order.
    pub skipped: Vec<SkippedEntry>,

    /// Wall time from the first decode to the serialized document.
    #[serde(rename = "elapsedMs", serialize_with = "as_millis")]
    pub elapsed: Duration,

    /// Size of the generated document in bytes.
    pub output_size: u64,
}

impl GenerationReport {
    /// Whether every entry made it into the document.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }

    /// One-line summary for a notification.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Created {} page(s) ({})",
            self.pages_written,
            self.format_output_size()
        );
        if !self.skipped.is_empty() {
            summary.push_str(&format!(", skipped {} image(s)", self.skipped.len()));
        }
        summary
    }

    /// Serialize the report for the host application.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn as_millis<S: Serializer>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// A generated document together with its report.
#[derive(Debug, Clone)]
pub struct GeneratedPdf {
    /// Serialized PDF document.
    pub bytes: Vec<u8>,

    /// What happened during the run.
    pub report: GenerationReport,
}
