//! Record repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide path-keyed upsert/get and folder-scoped ordered listing.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Updating an existing path preserves its `id` and `created_at`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::record::{RecordDraft, StoredRecord};
use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const RECORD_SELECT_SQL: &str = "SELECT
    path,
    id,
    folder,
    filename,
    format,
    raw,
    structured,
    date,
    ord,
    created_at,
    updated_at
FROM records";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// No record exists at the given path.
    NotFound(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(path) => write!(f, "record not found: {path}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for record persistence.
pub trait RecordRepository {
    /// Inserts or updates the record at the draft's path, returning the
    /// stored row.
    fn upsert(&self, draft: &RecordDraft) -> RepoResult<StoredRecord>;
    /// Gets one record by path.
    fn get(&self, path: &str) -> RepoResult<Option<StoredRecord>>;
    /// Lists records, optionally scoped to one folder, ordered by
    /// `date DESC, ord ASC, filename ASC`.
    fn list(&self, folder: Option<&str>) -> RepoResult<Vec<StoredRecord>>;
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn upsert(&self, draft: &RecordDraft) -> RepoResult<StoredRecord> {
        let path = draft.path();
        let now = Utc::now().timestamp_millis();

        let changed = self.conn.execute(
            "UPDATE records
             SET
                folder = ?2,
                filename = ?3,
                format = ?4,
                raw = ?5,
                structured = ?6,
                date = ?7,
                ord = ?8,
                updated_at = ?9
             WHERE path = ?1;",
            params![
                path.as_str(),
                draft.folder.as_str(),
                draft.filename.as_str(),
                draft.format.as_str(),
                draft.raw.as_str(),
                draft.structured.as_str(),
                draft.date,
                draft.order,
                now,
            ],
        )?;

        if changed == 0 {
            self.conn.execute(
                "INSERT INTO records (
                    path,
                    id,
                    folder,
                    filename,
                    format,
                    raw,
                    structured,
                    date,
                    ord,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
                params![
                    path.as_str(),
                    Uuid::new_v4().to_string(),
                    draft.folder.as_str(),
                    draft.filename.as_str(),
                    draft.format.as_str(),
                    draft.raw.as_str(),
                    draft.structured.as_str(),
                    draft.date,
                    draft.order,
                    now,
                    now,
                ],
            )?;
        }

        self.get(&path)?.ok_or_else(|| {
            RepoError::InvalidData(format!("upserted record `{path}` missing on read-back"))
        })
    }

    fn get(&self, path: &str) -> RepoResult<Option<StoredRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} WHERE path = ?1;"))?;

        let mut rows = stmt.query([path])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_record_row(row)?));
        }

        Ok(None)
    }

    fn list(&self, folder: Option<&str>) -> RepoResult<Vec<StoredRecord>> {
        let mut sql = format!("{RECORD_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(folder) = folder {
            sql.push_str(" AND folder = ?");
            bind_values.push(Value::Text(folder.to_string()));
        }

        sql.push_str(" ORDER BY date DESC, ord ASC, filename ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }

        Ok(records)
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<StoredRecord> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in records.id"))
    })?;

    Ok(StoredRecord {
        id,
        path: row.get("path")?,
        folder: row.get("folder")?,
        filename: row.get("filename")?,
        format: row.get("format")?,
        raw: row.get("raw")?,
        structured: row.get("structured")?,
        date: row.get("date")?,
        order: row.get("ord")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
