//! String-to-value casting.
//!
//! # Responsibility
//! - Heuristic cast chain for untyped input (`infer`).
//! - Deterministic per-field casting driven by type directives (`typed`).

pub mod infer;
pub mod typed;

/// Tokens accepted as boolean `true`, case-insensitive.
pub(crate) const TRUTHY_TOKENS: &[&str] = &["true", "yes", "on", "1"];
/// Tokens accepted as boolean `false`, case-insensitive.
pub(crate) const FALSY_TOKENS: &[&str] = &["false", "no", "off", "0"];
