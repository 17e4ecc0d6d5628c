//! Locale-string substitution for ingest bodies.
//!
//! # Responsibility
//! - Replace `$(loc:<key>[|<fallback>])` tokens with localized strings.
//! - Keep the resolution source behind a trait seam.
//!
//! # Invariants
//! - Unresolved keys substitute the fallback, empty when omitted.
//! - Text without tokens passes through unchanged.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeMap;

static LOC_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\(\s*loc\s*:\s*([A-Za-z0-9_.-]+)(?:\s*\|\s*([^)]+))?\s*\)")
        .expect("valid locale token regex")
});

/// Resolution source for locale keys.
pub trait Localizer {
    /// Returns the localized string for `key`, or `None` when unknown.
    fn localize(&self, key: &str) -> Option<String>;
}

/// Localizer that resolves nothing; every token falls back.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocalization;

impl Localizer for NoLocalization {
    fn localize(&self, _key: &str) -> Option<String> {
        None
    }
}

/// In-memory key-to-string table, handy for tests and embedded defaults.
#[derive(Debug, Clone, Default)]
pub struct TableLocalizer {
    entries: BTreeMap<String, String>,
}

impl TableLocalizer {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }
}

impl Localizer for TableLocalizer {
    fn localize(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}

/// Replaces every locale token in `text` using the given resolver.
pub fn substitute(text: &str, localizer: &dyn Localizer) -> String {
    LOC_TOKEN_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let key = &caps[1];
            let fallback = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
            localizer
                .localize(key)
                .unwrap_or_else(|| fallback.to_string())
        })
        .into_owned()
}
