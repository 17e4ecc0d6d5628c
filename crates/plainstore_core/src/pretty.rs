//! Canonical JSON rendering of structured data.

use crate::model::field::StructuredRecord;

/// Renders the human-facing pretty form: sorted keys, stable two-space
/// indentation.
pub fn render(record: &StructuredRecord) -> String {
    serde_json::to_string_pretty(record).unwrap_or_else(|_| "{}".to_string())
}

/// Renders the compact canonical form stored in the `structured` column.
pub fn compact(record: &StructuredRecord) -> String {
    serde_json::to_string(record).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::{compact, render};
    use crate::model::field::{FieldValue, StructuredRecord};

    #[test]
    fn keys_render_sorted_regardless_of_insertion_order() {
        let mut record = StructuredRecord::new();
        record.insert("zeta".to_string(), FieldValue::Int(1));
        record.insert("alpha".to_string(), FieldValue::Int(2));
        assert_eq!(compact(&record), r#"{"alpha":2,"zeta":1}"#);
    }

    #[test]
    fn empty_record_renders_an_empty_object() {
        let record = StructuredRecord::new();
        assert_eq!(render(&record), "{}");
        assert_eq!(compact(&record), "{}");
    }

    #[test]
    fn pretty_form_uses_stable_indentation() {
        let mut record = StructuredRecord::new();
        record.insert("a".to_string(), FieldValue::Bool(true));
        assert_eq!(render(&record), "{\n  \"a\": true\n}");
    }
}
