//! Merge-based updates over key-value maps.
//!
//! # Responsibility
//! - Apply a diff map onto a base map, honoring the deletion token.
//! - Produce the canonical merged text used as the new stored raw form.
//!
//! # Invariants
//! - Keys present only in the base are retained unchanged.
//! - The merged text is canonical (`lines::join` form), so stored raw text
//!   and structured data always agree.

use crate::parse::lines;
use std::collections::BTreeMap;

/// Literal diff value marking a key for removal.
pub const DELETION_TOKEN: &str = "(del)";

/// Merges a diff map into a base map.
///
/// Diff entries equal to [`DELETION_TOKEN`] remove the key; all others
/// insert or overwrite.
pub fn apply(
    base: &BTreeMap<String, String>,
    diff: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = base.clone();
    for (key, value) in diff {
        if value == DELETION_TOKEN {
            merged.remove(key);
        } else {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Merges diff text into base text, returning canonical merged text.
pub fn merge_text(base_raw: &str, diff_raw: &str) -> String {
    lines::join(&apply(&lines::parse(base_raw), &lines::parse(diff_raw)))
}
