//! Schema document analysis.
//!
//! The XML schema is only consulted for each resource's declared primary key.

mod keys;

pub use keys::{extract_primary_keys, DuplicateDeclaration, PrimaryKeys};
