//! Explicit per-field casting driven by type directives.
//!
//! # Responsibility
//! - Cast fields deterministically according to declared types.
//! - Parse the `types` directive syntax `key=type[, key=type...]`.
//!
//! # Invariants
//! - Unparseable `int`/`double` input omits the field; every omission is
//!   reported in [`CastOutcome::dropped`].
//! - `point2` components default to `0` instead of dropping.
//! - Unrecognized type tokens fall back to `string`.

use crate::cast::infer::infer_value;
use crate::cast::TRUTHY_TOKENS;
use crate::model::field::{FieldValue, Point2, StructuredRecord};
use std::collections::BTreeMap;

/// Declared field type, one of `string|int|double|bool|point2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Int,
    Double,
    Bool,
    Point2,
}

impl FieldType {
    /// Parses one type token; unknown tokens fall back to `String`.
    pub fn parse_token(token: &str) -> FieldType {
        match token.trim().to_ascii_lowercase().as_str() {
            "int" => FieldType::Int,
            "double" => FieldType::Double,
            "bool" => FieldType::Bool,
            "point2" => FieldType::Point2,
            _ => FieldType::String,
        }
    }
}

/// Result of a typed cast pass over one key-value map.
#[derive(Debug, Clone, PartialEq)]
pub struct CastOutcome {
    pub record: StructuredRecord,
    /// Field names omitted because their numeric input did not parse.
    pub dropped: Vec<String>,
}

/// Casts one raw string to the declared type.
///
/// Returns `None` only for failed `int`/`double` parses; every other type
/// is total.
pub fn cast_value(raw: &str, field_type: FieldType) -> Option<FieldValue> {
    let trimmed = raw.trim();
    match field_type {
        FieldType::String => Some(FieldValue::Text(trimmed.to_string())),
        FieldType::Int => trimmed.parse::<i64>().ok().map(FieldValue::Int),
        FieldType::Double => trimmed.parse::<f64>().ok().map(FieldValue::Float),
        FieldType::Bool => Some(FieldValue::Bool(
            TRUTHY_TOKENS.contains(&trimmed.to_ascii_lowercase().as_str()),
        )),
        FieldType::Point2 => Some(FieldValue::Point2(lenient_point2(trimmed))),
    }
}

/// Casts a parsed key-value map using the declared types.
///
/// Fields without a declared type go through the heuristic chain, so a
/// partial `types` directive only overrides the named fields.
pub fn cast_map(
    fields: &BTreeMap<String, String>,
    types: &BTreeMap<String, FieldType>,
) -> CastOutcome {
    let mut record = StructuredRecord::new();
    let mut dropped = Vec::new();

    for (key, value) in fields {
        match types.get(key) {
            Some(field_type) => match cast_value(value, *field_type) {
                Some(cast) => {
                    record.insert(key.clone(), cast);
                }
                None => dropped.push(key.clone()),
            },
            None => {
                record.insert(key.clone(), infer_value(value));
            }
        }
    }

    CastOutcome { record, dropped }
}

/// Parses a `types` directive value of the form `key=type[, key=type...]`.
///
/// Entries without `=` or with an empty key are skipped.
pub fn parse_type_directives(raw: &str) -> BTreeMap<String, FieldType> {
    let mut out = BTreeMap::new();
    for entry in raw.split(',') {
        let Some((key, token)) = entry.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        out.insert(key.to_string(), FieldType::parse_token(token));
    }
    out
}

fn lenient_point2(raw: &str) -> Point2 {
    let spaced = raw.replace(',', " ");
    let mut tokens = spaced.split_whitespace();
    let x = tokens
        .next()
        .and_then(|token| token.parse::<f64>().ok())
        .unwrap_or(0.0);
    let y = tokens
        .next()
        .and_then(|token| token.parse::<f64>().ok())
        .unwrap_or(0.0);
    Point2 { x, y }
}

#[cfg(test)]
mod tests {
    use super::{cast_map, cast_value, parse_type_directives, FieldType};
    use crate::model::field::{FieldValue, Point2};
    use std::collections::BTreeMap;

    #[test]
    fn string_cast_is_identity_on_trimmed_input() {
        assert_eq!(
            cast_value(" 42 ", FieldType::String),
            Some(FieldValue::Text("42".to_string()))
        );
    }

    #[test]
    fn numeric_casts_fail_to_none_on_bad_input() {
        assert_eq!(cast_value("12", FieldType::Int), Some(FieldValue::Int(12)));
        assert_eq!(cast_value("twelve", FieldType::Int), None);
        assert_eq!(
            cast_value("1.5", FieldType::Double),
            Some(FieldValue::Float(1.5))
        );
        assert_eq!(cast_value("n/a", FieldType::Double), None);
    }

    #[test]
    fn bool_cast_is_truthy_membership_else_false() {
        assert_eq!(
            cast_value("YES", FieldType::Bool),
            Some(FieldValue::Bool(true))
        );
        assert_eq!(
            cast_value("anything else", FieldType::Bool),
            Some(FieldValue::Bool(false))
        );
    }

    #[test]
    fn point2_defaults_missing_components_to_zero() {
        assert_eq!(
            cast_value("5", FieldType::Point2),
            Some(FieldValue::Point2(Point2 { x: 5.0, y: 0.0 }))
        );
        assert_eq!(
            cast_value("a,b", FieldType::Point2),
            Some(FieldValue::Point2(Point2 { x: 0.0, y: 0.0 }))
        );
    }

    #[test]
    fn unknown_type_token_falls_back_to_string() {
        assert_eq!(FieldType::parse_token("vector3"), FieldType::String);
        assert_eq!(FieldType::parse_token(" POINT2 "), FieldType::Point2);
    }

    #[test]
    fn cast_map_reports_dropped_fields() {
        let mut fields = BTreeMap::new();
        fields.insert("count".to_string(), "many".to_string());
        fields.insert("title".to_string(), "kept".to_string());
        let mut types = BTreeMap::new();
        types.insert("count".to_string(), FieldType::Int);
        types.insert("title".to_string(), FieldType::String);

        let outcome = cast_map(&fields, &types);
        assert_eq!(outcome.dropped, vec!["count".to_string()]);
        assert!(!outcome.record.contains_key("count"));
        assert_eq!(
            outcome.record.get("title"),
            Some(&FieldValue::Text("kept".to_string()))
        );
    }

    #[test]
    fn undeclared_fields_go_through_the_heuristic_chain() {
        let mut fields = BTreeMap::new();
        fields.insert("flag".to_string(), "yes".to_string());
        let types = BTreeMap::new();

        let outcome = cast_map(&fields, &types);
        assert_eq!(outcome.record.get("flag"), Some(&FieldValue::Bool(true)));
    }

    #[test]
    fn type_directive_syntax_parses_and_skips_malformed_entries() {
        let types = parse_type_directives("position=point2, count=int, bad entry, =bool");
        assert_eq!(types.get("position"), Some(&FieldType::Point2));
        assert_eq!(types.get("count"), Some(&FieldType::Int));
        assert_eq!(types.len(), 2);
    }
}
