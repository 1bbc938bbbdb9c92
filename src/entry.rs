//! Image records supplied by the host application.

use std::sync::Arc;

use crate::config::Orientation;
use crate::layout;
use crate::utils::format_file_size;

/// One image in the ordered input sequence.
///
/// Entries are created by the host when a file is accepted and are only ever
/// read by the engine. Reordering changes an entry's position in the
/// sequence, never its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    /// Stable identifier, unique within a session.
    pub id: String,

    /// Original encoded image bytes.
    pub bytes: Arc<[u8]>,

    /// Name shown to the user, usually the original filename.
    pub display_name: String,

    /// Size of the original file in bytes.
    pub byte_size: u64,

    /// Orientation for this image only; `None` defers to the run's setting.
    pub orientation_override: Option<Orientation>,
}

impl ImageEntry {
    /// Create an entry without an orientation override.
    ///
    /// `byte_size` is taken from the length of `bytes`.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            id: id.into(),
            byte_size: bytes.len() as u64,
            bytes,
            display_name: display_name.into(),
            orientation_override: None,
        }
    }

    /// Return the entry with its orientation override replaced.
    pub fn with_orientation(mut self, orientation: Option<Orientation>) -> Self {
        self.orientation_override = orientation;
        self
    }

    /// Orientation applied to this entry under the given global setting.
    pub fn effective_orientation(&self, global: Orientation) -> Orientation {
        layout::effective_orientation(self.orientation_override, global)
    }

    /// Human-readable size of the original file.
    pub fn format_size(&self) -> String {
        format_file_size(self.byte_size)
    }
}
