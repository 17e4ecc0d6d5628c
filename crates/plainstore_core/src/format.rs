//! Format-parser registry.
//!
//! # Responsibility
//! - Map format tags to body parsers through an explicit registry object.
//! - Ship the built-in `auto` heuristic parser.
//!
//! # Invariants
//! - The registry is a plain value owned by its caller; there is no
//!   process-global parser state.
//! - Format ids are lowercase `[a-z0-9_-]+` and unique.

use crate::cast::infer;
use crate::model::field::StructuredRecord;
use crate::parse::lines;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Format tag of the built-in heuristic parser.
pub const FORMAT_AUTO: &str = "auto";

/// One registered body parser.
pub trait FormatParser {
    /// Stable format tag, e.g. `auto`.
    fn format_id(&self) -> &str;
    /// Parses body text into structured data. Must be total.
    fn parse(&self, body: &str) -> StructuredRecord;
}

/// Registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatRegistryError {
    InvalidFormatId(String),
    DuplicateFormatId(String),
}

impl Display for FormatRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFormatId(value) => write!(f, "format id is invalid: {value}"),
            Self::DuplicateFormatId(value) => {
                write!(f, "format id already registered: {value}")
            }
        }
    }
}

impl Error for FormatRegistryError {}

/// Registry of format parsers, constructed by the caller and passed into
/// the ingest pipeline.
#[derive(Default)]
pub struct FormatRegistry {
    parsers: BTreeMap<String, Arc<dyn FormatParser>>,
}

impl FormatRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in `auto` parser registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register(Arc::new(AutoFormat))
            .expect("builtin auto parser must register");
        registry
    }

    /// Registers one parser under its format id.
    pub fn register(&mut self, parser: Arc<dyn FormatParser>) -> Result<(), FormatRegistryError> {
        let format_id = parser.format_id().trim().to_string();
        if !is_valid_format_id(&format_id) {
            return Err(FormatRegistryError::InvalidFormatId(format_id));
        }
        if self.parsers.contains_key(format_id.as_str()) {
            return Err(FormatRegistryError::DuplicateFormatId(format_id));
        }
        self.parsers.insert(format_id, parser);
        Ok(())
    }

    /// Returns sorted registered format ids.
    pub fn format_ids(&self) -> Vec<String> {
        self.parsers.keys().cloned().collect()
    }

    /// Returns one parser by format id.
    pub fn get(&self, format_id: &str) -> Option<Arc<dyn FormatParser>> {
        self.parsers.get(format_id.trim()).cloned()
    }

    /// Parses body text with the named format.
    ///
    /// Unknown format tags fall back to the `auto` parser, and to direct
    /// heuristic inference when no `auto` parser is registered, so parsing
    /// stays total.
    pub fn parse(&self, format_id: &str, body: &str) -> StructuredRecord {
        if let Some(parser) = self.get(format_id).or_else(|| self.get(FORMAT_AUTO)) {
            return parser.parse(body);
        }
        infer::infer_map(&lines::parse(body))
    }
}

struct AutoFormat;

impl FormatParser for AutoFormat {
    fn format_id(&self) -> &str {
        FORMAT_AUTO
    }

    fn parse(&self, body: &str) -> StructuredRecord {
        infer::infer_map(&lines::parse(body))
    }
}

fn is_valid_format_id(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}
