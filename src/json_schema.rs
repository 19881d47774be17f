//! JSON Schema generation for the JSON artifact.
//!
//! Schemas are generated using the schemars crate and exported via the
//! `schema` subcommand.

use schemars::{schema_for, Schema};

/// Schema of the JSON ERD artifact
pub fn erd_schema() -> Schema {
    schema_for!(crate::graph::format::json::ErdJson)
}

/// Pretty-printed schema text
pub fn erd_schema_json() -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&erd_schema())?)
}
