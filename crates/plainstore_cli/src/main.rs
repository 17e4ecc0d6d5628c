//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `plainstore_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use plainstore_core::db::open_db_in_memory;
use plainstore_core::{IngestRequest, SqliteRecordRepository, StoreService};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("plainstore_core version={}", plainstore_core::core_version());

    let conn = open_db_in_memory()?;
    let service = StoreService::new(SqliteRecordRepository::new(&conn));
    let outcome = service.ingest(&IngestRequest::new(
        "demo",
        "title: Smoke Check\ncount: 3\nposition: 1,2",
    ))?;

    println!("stored path={}", outcome.record.path);
    println!("{}", outcome.pretty);
    Ok(())
}
