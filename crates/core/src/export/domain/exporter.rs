use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::shared::constants::{
    EXPORT_FILE_EXTENSION, EXPORT_FILE_PREFIX, EXPORT_TIMESTAMP_FORMAT,
};

/// File-export boundary: persists the displayed transcript as a plain-text
/// artifact and reports where it landed.
pub trait TranscriptExporter: Send {
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be written; callers surface
    /// it as a transient status.
    fn export(&self, text: &str) -> Result<PathBuf, Box<dyn std::error::Error>>;
}

/// Export file name for a given moment: `transcript_` plus the ISO-8601
/// UTC timestamp with `:` and `T` flattened to `-`.
pub fn timestamped_file_name(now: DateTime<Utc>) -> String {
    format!(
        "{EXPORT_FILE_PREFIX}{}{EXPORT_FILE_EXTENSION}",
        now.format(EXPORT_TIMESTAMP_FORMAT)
    )
}
