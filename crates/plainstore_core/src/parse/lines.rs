//! Key-value line parsing and canonical serialization.
//!
//! # Responsibility
//! - Parse body text into a key-value map, skipping comments and
//!   separator-less lines.
//! - Serialize a map back to sorted `key: value` lines (`join`), the
//!   canonical form stored after merges.
//!
//! # Invariants
//! - Duplicate keys are last-write-wins.
//! - `join(parse(join(parse(x)))) == join(parse(x))` for any input `x`.

use std::collections::BTreeMap;

/// Lines starting with this character are skipped by [`parse`].
pub const COMMENT_MARKER: char = '#';
/// First occurrence splits a line into key and value.
pub const KEY_VALUE_SEPARATOR: char = ':';

/// Parses body text into a key-value map.
///
/// Per line: trim, skip empty or comment lines, split on the first `:`,
/// trim both sides. Lines without a separator are skipped.
pub fn parse(body: &str) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for line in body.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
            continue;
        }
        let Some((key, value)) = trimmed.split_once(KEY_VALUE_SEPARATOR) else {
            continue;
        };
        out.insert(key.trim().to_string(), value.trim().to_string());
    }
    out
}

/// Serializes a map to canonical `key: value` lines.
///
/// Keys are sorted lexicographically, one field per line. This is the
/// inverse of [`parse`] modulo whitespace and skipped lines.
pub fn join(map: &BTreeMap<String, String>) -> String {
    map.iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::{join, parse};

    #[test]
    fn parses_trimmed_keys_and_values() {
        let map = parse("  title :  Hello World \ncount: 3");
        assert_eq!(map.get("title").map(String::as_str), Some("Hello World"));
        assert_eq!(map.get("count").map(String::as_str), Some("3"));
    }

    #[test]
    fn skips_comments_blanks_and_separator_less_lines() {
        let map = parse("# comment\n\nnot a field\nkey: value");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("key").map(String::as_str), Some("value"));
    }

    #[test]
    fn duplicate_keys_keep_last_value() {
        let map = parse("key: first\nkey: second");
        assert_eq!(map.get("key").map(String::as_str), Some("second"));
    }

    #[test]
    fn value_may_contain_further_separators() {
        let map = parse("url: https://example.com/x");
        assert_eq!(
            map.get("url").map(String::as_str),
            Some("https://example.com/x")
        );
    }

    #[test]
    fn join_emits_sorted_lines() {
        let map = parse("zeta: 1\nalpha: 2");
        assert_eq!(join(&map), "alpha: 2\nzeta: 1");
    }

    #[test]
    fn parse_join_roundtrip_is_idempotent() {
        let source = "b: 2\n# note\na: 1\nbroken line\nb: 3";
        let canonical = join(&parse(source));
        assert_eq!(join(&parse(&canonical)), canonical);
    }
}
