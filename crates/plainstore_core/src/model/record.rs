//! Persisted record read/write models.
//!
//! # Responsibility
//! - Carry one stored record row between repository and callers.
//! - Define the single path identity scheme used as the lookup key.
//!
//! # Invariants
//! - `path` is always `folder + "/" + filename` (bare `filename` for an
//!   empty folder); it never changes once a record is created.
//! - Metadata timestamps are epoch milliseconds.

use uuid::Uuid;

/// Read model of one persisted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    /// Stable audit id; never used as a lookup key.
    pub id: Uuid,
    /// Unique lookup key, derived from `(folder, filename)`.
    pub path: String,
    pub folder: String,
    /// Display name within the folder, explicit or derived from content.
    pub filename: String,
    /// Format tag the structured data was produced with.
    pub format: String,
    /// Stored raw key-value text, canonical after merges.
    pub raw: String,
    /// Canonical JSON rendering of the structured data, sorted keys.
    pub structured: String,
    /// Content date in epoch milliseconds, primary ordering key.
    pub date: i64,
    /// Secondary ordering key within the same date.
    pub order: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Write model handed to the repository by the ingest pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    pub folder: String,
    pub filename: String,
    pub format: String,
    pub raw: String,
    pub structured: String,
    pub date: i64,
    pub order: i64,
}

impl RecordDraft {
    /// Returns the unique path this draft will be stored under.
    pub fn path(&self) -> String {
        record_path(&self.folder, &self.filename)
    }
}

/// Derives the unique record path from folder and filename.
pub fn record_path(folder: &str, filename: &str) -> String {
    if folder.is_empty() {
        filename.to_string()
    } else {
        format!("{folder}/{filename}")
    }
}
