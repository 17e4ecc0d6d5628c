//! Heuristic cast chain for untyped field values.
//!
//! # Responsibility
//! - Map every raw string to exactly one [`FieldValue`], never an error.
//! - Apply the fixed priority bool > int > float > point2 > timestamp >
//!   string, first match wins.
//!
//! # Invariants
//! - The chain is pure and total.
//! - Integer matches require an exact round-trip (`"007"` stays text).
//! - Timestamps normalize to canonical UTC second-precision `Z` form.

use crate::cast::{FALSY_TOKENS, TRUTHY_TOKENS};
use crate::model::field::{FieldValue, Point2, StructuredRecord};
use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use std::collections::BTreeMap;

/// Casts one raw string through the heuristic chain.
pub fn infer_value(raw: &str) -> FieldValue {
    let trimmed = raw.trim();
    let lowered = trimmed.to_ascii_lowercase();

    if TRUTHY_TOKENS.contains(&lowered.as_str()) {
        return FieldValue::Bool(true);
    }
    if FALSY_TOKENS.contains(&lowered.as_str()) {
        return FieldValue::Bool(false);
    }

    if let Ok(value) = trimmed.parse::<i64>() {
        if value.to_string() == trimmed {
            return FieldValue::Int(value);
        }
    }

    if trimmed.contains(['.', 'e', 'E']) {
        if let Ok(value) = trimmed.parse::<f64>() {
            return FieldValue::Float(value);
        }
    }

    if let Some(point) = parse_point2(trimmed) {
        return FieldValue::Point2(point);
    }

    if let Some(timestamp) = parse_timestamp(trimmed) {
        return FieldValue::Timestamp(canonical_timestamp(&timestamp));
    }

    FieldValue::Text(trimmed.to_string())
}

/// Casts every entry of a parsed key-value map.
pub fn infer_map(fields: &BTreeMap<String, String>) -> StructuredRecord {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), infer_value(value)))
        .collect()
}

/// Parses an ISO-8601 datetime or a bare `yyyy-MM-dd` date (UTC midnight).
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight))
}

/// Renders the canonical stored form: UTC, second precision, `Z` suffix.
pub(crate) fn canonical_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_point2(raw: &str) -> Option<Point2> {
    let spaced = raw.replace(',', " ");
    let tokens: Vec<&str> = spaced.split_whitespace().collect();
    if tokens.len() != 2 {
        return None;
    }
    let x = tokens[0].parse::<f64>().ok()?;
    let y = tokens[1].parse::<f64>().ok()?;
    Some(Point2 { x, y })
}

#[cfg(test)]
mod tests {
    use super::{infer_value, parse_timestamp};
    use crate::model::field::{FieldValue, Point2};

    #[test]
    fn boolean_tokens_cast_case_insensitively() {
        for token in ["true", "YES", "On", "1"] {
            assert_eq!(infer_value(token), FieldValue::Bool(true), "token {token}");
        }
        for token in ["false", "No", "OFF", "0"] {
            assert_eq!(infer_value(token), FieldValue::Bool(false), "token {token}");
        }
    }

    #[test]
    fn exact_integers_cast_to_int() {
        assert_eq!(infer_value("42"), FieldValue::Int(42));
        assert_eq!(infer_value("-7"), FieldValue::Int(-7));
    }

    #[test]
    fn padded_integers_stay_text() {
        assert_eq!(infer_value("007"), FieldValue::Text("007".to_string()));
        assert_eq!(infer_value("+5"), FieldValue::Text("+5".to_string()));
    }

    #[test]
    fn floats_require_a_marker_character() {
        assert_eq!(infer_value("42.0"), FieldValue::Float(42.0));
        assert_eq!(infer_value("1e3"), FieldValue::Float(1000.0));
        // "42" must not cast to float; the int branch claims it first.
        assert_eq!(infer_value("42"), FieldValue::Int(42));
    }

    #[test]
    fn two_numeric_tokens_cast_to_point2() {
        let expected = FieldValue::Point2(Point2 { x: 3.0, y: 4.0 });
        assert_eq!(infer_value("3,4"), expected);
        assert_eq!(infer_value("3 4"), expected);
        assert_eq!(infer_value("3, 4"), expected);
    }

    #[test]
    fn three_tokens_do_not_cast_to_point2() {
        assert_eq!(infer_value("1,2,3"), FieldValue::Text("1,2,3".to_string()));
    }

    #[test]
    fn bare_dates_normalize_like_their_iso_equivalent() {
        let from_date = infer_value("2024-01-15");
        let from_iso = infer_value("2024-01-15T00:00:00Z");
        assert_eq!(from_date, from_iso);
        assert_eq!(
            from_date,
            FieldValue::Timestamp("2024-01-15T00:00:00Z".to_string())
        );
    }

    #[test]
    fn offset_datetimes_normalize_to_utc() {
        assert_eq!(
            infer_value("2024-01-15T10:30:00+02:00"),
            FieldValue::Timestamp("2024-01-15T08:30:00Z".to_string())
        );
    }

    #[test]
    fn unmatched_input_falls_back_to_trimmed_text() {
        assert_eq!(
            infer_value("  hello world  "),
            FieldValue::Text("hello world".to_string())
        );
    }

    #[test]
    fn datetime_without_offset_is_not_a_timestamp() {
        assert!(parse_timestamp("2024-01-15T10:30:00").is_none());
    }
}
