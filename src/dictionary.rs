//! Data dictionary table parsing.
//!
//! The dictionary is a CSV export with one row per field. Only three columns
//! matter for the diagram: the owning resource, the field's standard name and
//! the key of the resource it points at (blank for ordinary fields).

use crate::config::ColumnsConfig;
use crate::error::{ErdError, Result};

/// One field row of the data dictionary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryRow {
    pub resource: String,
    pub field: String,
    /// Raw target key cell, `None` when the column is absent or the cell is blank
    pub target: Option<String>,
}

impl DictionaryRow {
    pub fn new(resource: &str, field: &str, target: Option<&str>) -> Self {
        Self {
            resource: resource.to_string(),
            field: field.to_string(),
            target: target.map(str::to_string),
        }
    }
}

/// Parse the dictionary CSV into rows, in file order.
pub fn parse_dictionary(text: &str, columns: &ColumnsConfig) -> Result<Vec<DictionaryRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);

    let resource_idx = position(columns.resource.as_str())
        .ok_or_else(|| ErdError::MissingColumn(columns.resource.clone()))?;
    let field_idx = position(columns.field.as_str())
        .ok_or_else(|| ErdError::MissingColumn(columns.field.clone()))?;
    let target_idx = position(columns.target.as_str());
    if target_idx.is_none() {
        tracing::warn!(
            column = %columns.target,
            "target column not found, no foreign keys will be detected"
        );
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cell = |idx: usize| record.get(idx).map(str::trim).unwrap_or("");

        let target = target_idx
            .map(cell)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        rows.push(DictionaryRow {
            resource: cell(resource_idx).to_string(),
            field: cell(field_idx).to_string(),
            target,
        });
    }

    Ok(rows)
}
