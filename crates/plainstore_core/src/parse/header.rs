//! Directive header parsing.
//!
//! # Responsibility
//! - Scan leading `@key: value` lines into a directive map.
//! - Return the remaining body unchanged, internal line breaks preserved.
//!
//! # Invariants
//! - Scanning stops at the `---` sentinel (consumed) or at the first
//!   non-directive line (kept in the body).
//! - Duplicate directive keys are last-write-wins.

use std::collections::BTreeMap;

/// Marker character opening a directive line.
pub const DIRECTIVE_MARKER: char = '@';
/// Line that terminates header scanning without becoming body text.
pub const HEADER_SENTINEL: &str = "---";

/// Decomposed ingest input: leading directives plus the body text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawBlock {
    pub directives: BTreeMap<String, String>,
    pub body: String,
}

/// Splits raw text into a directive map and the remaining body.
///
/// A line is a directive iff, after trimming, it starts with
/// [`DIRECTIVE_MARKER`] and contains a `:` separator; key and value are
/// trimmed. Input without a header yields an empty map and the full text as
/// body.
pub fn parse(raw: &str) -> RawBlock {
    let mut directives = BTreeMap::new();
    let mut consumed = 0usize;

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed == HEADER_SENTINEL {
            consumed += 1;
            break;
        }
        let Some(rest) = trimmed.strip_prefix(DIRECTIVE_MARKER) else {
            break;
        };
        let Some((key, value)) = rest.split_once(':') else {
            break;
        };
        directives.insert(key.trim().to_string(), value.trim().to_string());
        consumed += 1;
    }

    let body = raw
        .lines()
        .skip(consumed)
        .collect::<Vec<_>>()
        .join("\n");

    RawBlock { directives, body }
}
