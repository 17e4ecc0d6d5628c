//! Ingest pipeline orchestration.
//!
//! # Responsibility
//! - Run header parsing, localization, merge, key-value parsing, casting
//!   and name derivation in order, then hand the result to the repository.
//! - Provide load/list entry points with semantic `NotFound` errors.
//!
//! # Invariants
//! - No state is persisted before the final upsert call.
//! - Merge-mode ingests store canonical (sorted, re-joined) raw text, so
//!   raw text and structured data always agree.
//! - Explicit name arguments win over `path` directives, which win over
//!   derived names.

use crate::cast::infer;
use crate::cast::typed::{self, FieldType};
use crate::format::{FormatRegistry, FORMAT_AUTO};
use crate::localize::{self, Localizer, NoLocalization};
use crate::merge;
use crate::model::record::{record_path, RecordDraft, StoredRecord};
use crate::naming;
use crate::parse::{header, lines};
use crate::pretty;
use crate::repo::record_repo::{RecordRepository, RepoError};
use chrono::Utc;
use log::{info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Header directives interpreted by the pipeline. Unknown directives are
/// preserved in the parsed block but ignored here.
pub const DIRECTIVE_PATH: &str = "path";
pub const DIRECTIVE_FORMAT: &str = "format";
pub const DIRECTIVE_TYPES: &str = "types";
pub const DIRECTIVE_DATE: &str = "date";
pub const DIRECTIVE_ORDER: &str = "order";

/// How an ingest treats previously stored content at the same path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngestMode {
    /// Replace the stored raw text with the new body.
    #[default]
    Replace,
    /// Apply the new body as a diff against the stored raw text.
    Merge,
}

/// One ingest call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestRequest {
    pub folder: String,
    /// Explicit display name; derived from content when absent.
    pub name: Option<String>,
    pub text: String,
    pub mode: IngestMode,
    /// Explicit per-field types; merged over a `types` header directive,
    /// explicit entries winning per key.
    pub types: Option<BTreeMap<String, FieldType>>,
}

impl IngestRequest {
    /// Creates a replace-mode request without explicit name or types.
    pub fn new(folder: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            name: None,
            text: text.into(),
            mode: IngestMode::Replace,
            types: None,
        }
    }
}

/// Result of one ingest: the stored row plus derived projections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    pub record: StoredRecord,
    /// Pretty-printed structured data, sorted keys.
    pub pretty: String,
    /// Fields omitted by explicit typed casting.
    pub dropped_fields: Vec<String>,
}

/// Service error for store use-cases.
#[derive(Debug)]
pub enum StoreError {
    /// No record stored at the requested path.
    NotFound(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "record not found: {path}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(path) => Self::NotFound(path),
            other => Self::Repo(other),
        }
    }
}

/// Store service facade over repository implementations.
pub struct StoreService<R: RecordRepository> {
    repo: R,
    formats: FormatRegistry,
    localizer: Arc<dyn Localizer>,
}

impl<R: RecordRepository> StoreService<R> {
    /// Creates a service with built-in formats and no localization.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            formats: FormatRegistry::with_builtins(),
            localizer: Arc::new(NoLocalization),
        }
    }

    /// Creates a service using a caller-constructed format registry.
    pub fn with_registry(repo: R, formats: FormatRegistry) -> Self {
        Self {
            repo,
            formats,
            localizer: Arc::new(NoLocalization),
        }
    }

    /// Replaces the localization source.
    pub fn with_localizer(mut self, localizer: Arc<dyn Localizer>) -> Self {
        self.localizer = localizer;
        self
    }

    /// Runs the full ingest pipeline and upserts the result.
    pub fn ingest(&self, request: &IngestRequest) -> Result<IngestOutcome, StoreError> {
        let block = header::parse(&request.text);
        let body = localize::substitute(&block.body, self.localizer.as_ref());

        let format = block
            .directives
            .get(DIRECTIVE_FORMAT)
            .cloned()
            .unwrap_or_else(|| FORMAT_AUTO.to_string());
        let date = resolve_date(&block.directives);
        let order = resolve_order(&block.directives);
        let types = resolve_types(request.types.as_ref(), &block.directives);

        let (folder, mut filename) = resolve_identity(request, &block.directives);
        if filename.trim().is_empty() {
            filename = naming::derive_name(&body);
        }
        let path = record_path(&folder, &filename);

        let (raw, fields) = match request.mode {
            IngestMode::Merge => match self.repo.get(&path)? {
                Some(existing) => {
                    let canonical = merge::merge_text(&existing.raw, &body);
                    let fields = lines::parse(&canonical);
                    (canonical, fields)
                }
                None => {
                    let fields = lines::parse(&body);
                    (body, fields)
                }
            },
            IngestMode::Replace => {
                let fields = lines::parse(&body);
                (body, fields)
            }
        };

        let (structured, dropped_fields) = if types.is_empty() {
            (self.formats.parse(&format, &raw), Vec::new())
        } else {
            let outcome = typed::cast_map(&fields, &types);
            (outcome.record, outcome.dropped)
        };

        for field in &dropped_fields {
            warn!("event=field_dropped module=service path={path} field={field}");
        }

        let draft = RecordDraft {
            folder,
            filename,
            format,
            raw,
            structured: pretty::compact(&structured),
            date,
            order,
        };
        let record = self.repo.upsert(&draft)?;

        info!(
            "event=ingest module=service status=ok path={} mode={:?} fields={} dropped={}",
            record.path,
            request.mode,
            structured.len(),
            dropped_fields.len()
        );

        Ok(IngestOutcome {
            record,
            pretty: pretty::render(&structured),
            dropped_fields,
        })
    }

    /// Loads one record by path.
    pub fn load(&self, path: &str) -> Result<StoredRecord, StoreError> {
        self.repo
            .get(path)?
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    /// Loads the record whose name would be derived from the given text.
    pub fn load_by_derived_name(&self, folder: &str, text: &str) -> Result<StoredRecord, StoreError> {
        let block = header::parse(text);
        let body = localize::substitute(&block.body, self.localizer.as_ref());
        let name = naming::derive_name(&body);
        self.load(&record_path(folder, &name))
    }

    /// Loads the record at `(folder, name)`, ingesting `default_text` when
    /// absent. The thunk is evaluated only on a miss.
    pub fn load_or_ingest_default<F>(
        &self,
        folder: &str,
        name: &str,
        default_text: F,
    ) -> Result<StoredRecord, StoreError>
    where
        F: FnOnce() -> String,
    {
        let path = record_path(folder, name);
        if let Some(existing) = self.repo.get(&path)? {
            return Ok(existing);
        }

        let request = IngestRequest {
            folder: folder.to_string(),
            name: Some(name.to_string()),
            text: default_text(),
            mode: IngestMode::Replace,
            types: None,
        };
        Ok(self.ingest(&request)?.record)
    }

    /// Lists stored records, optionally scoped to one folder.
    pub fn list(&self, folder: Option<&str>) -> Result<Vec<StoredRecord>, StoreError> {
        Ok(self.repo.list(folder)?)
    }
}

/// Resolves record identity: explicit name > `path` directive > derived.
fn resolve_identity(
    request: &IngestRequest,
    directives: &BTreeMap<String, String>,
) -> (String, String) {
    if let Some(name) = request.name.as_ref() {
        return (request.folder.clone(), name.clone());
    }
    if let Some(path_directive) = directives.get(DIRECTIVE_PATH) {
        return split_path_directive(path_directive);
    }
    (request.folder.clone(), String::new())
}

/// Splits a `path` directive into `(folder, filename)`; the directive
/// overrides the request folder entirely.
fn split_path_directive(value: &str) -> (String, String) {
    match value.rsplit_once('/') {
        Some((folder, name)) => (folder.to_string(), name.to_string()),
        None => (String::new(), value.to_string()),
    }
}

/// Overlays explicit type entries onto a parsed `types` directive.
fn resolve_types(
    explicit: Option<&BTreeMap<String, FieldType>>,
    directives: &BTreeMap<String, String>,
) -> BTreeMap<String, FieldType> {
    let mut types = directives
        .get(DIRECTIVE_TYPES)
        .map(|raw| typed::parse_type_directives(raw))
        .unwrap_or_default();
    if let Some(explicit) = explicit {
        for (key, field_type) in explicit {
            types.insert(key.clone(), *field_type);
        }
    }
    types
}

fn resolve_date(directives: &BTreeMap<String, String>) -> i64 {
    if let Some(raw) = directives.get(DIRECTIVE_DATE) {
        if let Some(parsed) = infer::parse_timestamp(raw.trim()) {
            return parsed.timestamp_millis();
        }
        warn!("event=bad_directive module=service directive=date value={raw}");
    }
    Utc::now().timestamp_millis()
}

fn resolve_order(directives: &BTreeMap<String, String>) -> i64 {
    if let Some(raw) = directives.get(DIRECTIVE_ORDER) {
        if let Ok(parsed) = raw.trim().parse::<i64>() {
            return parsed;
        }
        warn!("event=bad_directive module=service directive=order value={raw}");
    }
    0
}
