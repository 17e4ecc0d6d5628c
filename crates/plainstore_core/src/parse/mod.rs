//! Raw text decomposition.
//!
//! # Responsibility
//! - Split a raw block into directive header and body.
//! - Parse the body into an ordered key-value map with a canonical inverse.

pub mod header;
pub mod lines;
