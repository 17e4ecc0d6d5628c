//! Display-name derivation for content without an explicit identifier.
//!
//! # Responsibility
//! - Pick a human-readable name from well-known fields, in fixed precedence.
//! - Sanitize candidates into short, path-safe display names.
//!
//! # Invariants
//! - Derivation is total: when nothing qualifies, a timestamp name is
//!   generated.
//! - Sanitized names never exceed 40 characters and contain no `/` or `:`.

use crate::parse::lines;
use chrono::Local;

/// Candidate fields tried in order; `image`/`asset` values are humanized
/// from their path form first.
const NAME_CANDIDATE_KEYS: &[&str] = &["title", "image", "asset", "text", "caption"];
const MAX_NAME_CHARS: usize = 40;
const TIMESTAMP_NAME_FORMAT: &str = "%Y-%m-%d %H.%M.%S";

/// Derives a display name from unstructured content.
///
/// Precedence: candidate fields > value of the first non-blank line >
/// current-timestamp name.
pub fn derive_name(text: &str) -> String {
    let fields = lines::parse(text);
    for key in NAME_CANDIDATE_KEYS {
        let Some(raw) = fields.get(*key) else {
            continue;
        };
        let candidate = if matches!(*key, "image" | "asset") {
            humanize_asset_name(raw)
        } else {
            raw.clone()
        };
        let name = sanitize_name(&candidate);
        if !name.is_empty() {
            return name;
        }
    }

    let name = sanitize_name(&first_line_value(text));
    if name.is_empty() {
        timestamp_name()
    } else {
        name
    }
}

/// Turns a path-like asset reference into words: last segment, extension
/// stripped, underscores and hyphens as spaces.
fn humanize_asset_name(raw: &str) -> String {
    let last = raw.rsplit('/').next().unwrap_or(raw);
    let stem = match last.rfind('.') {
        Some(0) | None => last,
        Some(index) => &last[..index],
    };
    stem.replace(['_', '-'], " ")
}

/// Flattens separators to spaces, collapses whitespace, caps at 40 chars.
fn sanitize_name(raw: &str) -> String {
    let replaced = raw.replace(['\n', '\t', '/', ':'], " ");
    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .chars()
        .take(MAX_NAME_CHARS)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Returns the value part of the first non-blank line.
///
/// Lines with a separator but an empty value are skipped; a line without a
/// separator is used whole.
fn first_line_value(text: &str) -> String {
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match trimmed.split_once(':') {
            Some((_, value)) => {
                let value = value.trim();
                if !value.is_empty() {
                    return value.to_string();
                }
            }
            None => return trimmed.to_string(),
        }
    }
    String::new()
}

fn timestamp_name() -> String {
    Local::now().format(TIMESTAMP_NAME_FORMAT).to_string()
}
