//! Core domain logic for PlainStore.
//! This crate is the single source of truth for ingestion and typing
//! invariants.

pub mod cast;
pub mod db;
pub mod format;
pub mod localize;
pub mod logging;
pub mod merge;
pub mod model;
pub mod naming;
pub mod parse;
pub mod pretty;
pub mod repo;
pub mod service;

pub use cast::typed::{CastOutcome, FieldType};
pub use format::{FormatParser, FormatRegistry, FormatRegistryError, FORMAT_AUTO};
pub use localize::{Localizer, NoLocalization, TableLocalizer};
pub use logging::{default_log_level, init_logging, logging_status};
pub use merge::DELETION_TOKEN;
pub use model::field::{FieldValue, Point2, StructuredRecord};
pub use model::record::{record_path, RecordDraft, StoredRecord};
pub use parse::header::RawBlock;
pub use repo::record_repo::{RecordRepository, RepoError, RepoResult, SqliteRecordRepository};
pub use service::store_service::{
    IngestMode, IngestOutcome, IngestRequest, StoreError, StoreService,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
