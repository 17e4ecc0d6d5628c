use plainstore_core::db::open_db_in_memory;
use plainstore_core::{
    FieldType, IngestMode, IngestRequest, SqliteRecordRepository, StoreService, TableLocalizer,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

fn structured(record_json: &str) -> Value {
    serde_json::from_str(record_json).expect("structured column should hold valid JSON")
}

#[test]
fn types_directive_bypasses_heuristic_inference() {
    let conn = open_db_in_memory().unwrap();
    let service = StoreService::new(SqliteRecordRepository::new(&conn));

    let mut request = IngestRequest::new(
        "scene",
        "@types: position=point2\n---\nposition: 1,2\nlabel: spawn",
    );
    request.name = Some("spawn-point".to_string());
    let outcome = service.ingest(&request).unwrap();

    let data = structured(&outcome.record.structured);
    assert_eq!(data["position"], json!({"x": 1.0, "y": 2.0}));
    assert_eq!(data["label"], json!("spawn"));
    assert!(outcome.dropped_fields.is_empty());
}

#[test]
fn explicit_type_argument_wins_over_the_directive() {
    let conn = open_db_in_memory().unwrap();
    let service = StoreService::new(SqliteRecordRepository::new(&conn));

    let mut types = BTreeMap::new();
    types.insert("count".to_string(), FieldType::String);
    let mut request = IngestRequest::new("inv", "@types: count=int\n---\ncount: 42");
    request.name = Some("counts".to_string());
    request.types = Some(types);

    let outcome = service.ingest(&request).unwrap();
    assert_eq!(structured(&outcome.record.structured)["count"], json!("42"));
}

#[test]
fn unparseable_numeric_fields_are_dropped_and_reported() {
    let conn = open_db_in_memory().unwrap();
    let service = StoreService::new(SqliteRecordRepository::new(&conn));

    let mut request = IngestRequest::new("inv", "@types: count=int\n---\ncount: many\nname: axe");
    request.name = Some("axe".to_string());
    let outcome = service.ingest(&request).unwrap();

    assert_eq!(outcome.dropped_fields, vec!["count".to_string()]);
    let data = structured(&outcome.record.structured);
    assert!(data.get("count").is_none());
    assert_eq!(data["name"], json!("axe"));
}

#[test]
fn heuristic_inference_covers_the_scalar_vocabulary() {
    let conn = open_db_in_memory().unwrap();
    let service = StoreService::new(SqliteRecordRepository::new(&conn));

    let mut request = IngestRequest::new(
        "mixed",
        "flag: yes\ncount: 42\nratio: 42.0\npos: 3 4\nwhen: 2024-01-15\nnote: keep this",
    );
    request.name = Some("sample".to_string());
    let outcome = service.ingest(&request).unwrap();

    let data = structured(&outcome.record.structured);
    assert_eq!(data["flag"], json!(true));
    assert_eq!(data["count"], json!(42));
    assert_eq!(data["ratio"], json!(42.0));
    assert_eq!(data["pos"], json!({"x": 3.0, "y": 4.0}));
    assert_eq!(data["when"], json!("2024-01-15T00:00:00Z"));
    assert_eq!(data["note"], json!("keep this"));
}

#[test]
fn merge_mode_applies_deletion_tokens_and_stores_canonical_text() {
    let conn = open_db_in_memory().unwrap();
    let service = StoreService::new(SqliteRecordRepository::new(&conn));

    let mut base = IngestRequest::new("cfg", "a: 1\nb: 2");
    base.name = Some("doc".to_string());
    service.ingest(&base).unwrap();

    let mut diff = IngestRequest::new("cfg", "b: (del)\nc: 3");
    diff.name = Some("doc".to_string());
    diff.mode = IngestMode::Merge;
    let outcome = service.ingest(&diff).unwrap();

    assert_eq!(outcome.record.raw, "a: 1\nc: 3");
    let data = structured(&outcome.record.structured);
    assert_eq!(data, json!({"a": 1, "c": 3}));
}

#[test]
fn merge_without_a_prior_record_behaves_like_replace() {
    let conn = open_db_in_memory().unwrap();
    let service = StoreService::new(SqliteRecordRepository::new(&conn));

    let mut request = IngestRequest::new("cfg", "fresh: 1");
    request.name = Some("new".to_string());
    request.mode = IngestMode::Merge;
    let outcome = service.ingest(&request).unwrap();

    assert_eq!(outcome.record.raw, "fresh: 1");
}

#[test]
fn derived_names_follow_candidate_precedence() {
    let conn = open_db_in_memory().unwrap();
    let service = StoreService::new(SqliteRecordRepository::new(&conn));

    let titled = service
        .ingest(&IngestRequest::new("notes", "title: Hello World"))
        .unwrap();
    assert_eq!(titled.record.path, "notes/Hello World");

    let pictured = service
        .ingest(&IngestRequest::new("notes", "image: folder/My_Pic.png"))
        .unwrap();
    assert_eq!(pictured.record.path, "notes/My Pic");
}

#[test]
fn path_directive_overrides_the_request_folder() {
    let conn = open_db_in_memory().unwrap();
    let service = StoreService::new(SqliteRecordRepository::new(&conn));

    let outcome = service
        .ingest(&IngestRequest::new(
            "ignored",
            "@path: assets/banner\n---\ntitle: Banner",
        ))
        .unwrap();

    assert_eq!(outcome.record.path, "assets/banner");
    assert_eq!(outcome.record.folder, "assets");
    assert_eq!(outcome.record.filename, "banner");
}

#[test]
fn locale_tokens_are_substituted_before_parsing() {
    let conn = open_db_in_memory().unwrap();
    let mut table = BTreeMap::new();
    table.insert("greeting".to_string(), "Hallo".to_string());
    let service = StoreService::new(SqliteRecordRepository::new(&conn))
        .with_localizer(Arc::new(TableLocalizer::new(table)));

    let mut request = IngestRequest::new(
        "ui",
        "caption: $(loc:greeting|Hi)\nsubtitle: $(loc:unknown|Fallback)",
    );
    request.name = Some("labels".to_string());
    let outcome = service.ingest(&request).unwrap();

    let data = structured(&outcome.record.structured);
    assert_eq!(data["caption"], json!("Hallo"));
    assert_eq!(data["subtitle"], json!("Fallback"));
    assert_eq!(
        outcome.record.raw,
        "caption: Hallo\nsubtitle: Fallback"
    );
}

#[test]
fn pretty_rendering_matches_the_stored_structured_column() {
    let conn = open_db_in_memory().unwrap();
    let service = StoreService::new(SqliteRecordRepository::new(&conn));

    let mut request = IngestRequest::new("notes", "b: 2\na: 1");
    request.name = Some("sorted".to_string());
    let outcome = service.ingest(&request).unwrap();

    let pretty: Value = serde_json::from_str(&outcome.pretty).unwrap();
    assert_eq!(pretty, structured(&outcome.record.structured));
    // Sorted keys in both renderings.
    assert!(outcome.pretty.find("\"a\"").unwrap() < outcome.pretty.find("\"b\"").unwrap());
}
