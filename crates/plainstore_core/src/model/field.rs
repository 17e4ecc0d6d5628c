//! Typed field values and the structured record shape.
//!
//! # Responsibility
//! - Represent one cast scalar or pair value per field.
//! - Keep structured output deterministic (sorted keys) for serialization.
//!
//! # Invariants
//! - Field keys are unique within a record.
//! - Serialization renders plain JSON values, never enum tags.

use serde::Serialize;
use std::collections::BTreeMap;

/// Final typed mapping produced per ingest: field name to cast value.
///
/// `BTreeMap` keeps key order deterministic, so serialized output is stable
/// without a separate sorting pass.
pub type StructuredRecord = BTreeMap<String, FieldValue>;

/// Two-component numeric pair, e.g. a position or size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

/// One cast field value.
///
/// Produced either by the heuristic cast chain or by an explicit per-field
/// type directive. Serializes untagged: booleans and numbers stay bare JSON
/// scalars, pairs become `{"x":..,"y":..}` objects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Point2(Point2),
    /// Canonical UTC ISO-8601 string, second precision, `Z` suffix.
    Timestamp(String),
    Text(String),
}
