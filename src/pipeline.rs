//! End-to-end derivation: load both sources, then build the views.
//!
//! Every stage takes its inputs by value or reference and returns a new
//! value; nothing is shared between runs.

use crate::config::ColumnsConfig;
use crate::dictionary::{parse_dictionary, DictionaryRow};
use crate::error::{ErdError, Result};
use crate::graph::ErdView;
use crate::schema::{extract_primary_keys, PrimaryKeys};
use crate::source::{Source, SourceLoader};

/// Parsed contents of both sources
#[derive(Debug, Clone)]
pub struct Inputs {
    pub rows: Vec<DictionaryRow>,
    pub keys: PrimaryKeys,
}

/// Fetch the dictionary first, then the schema. The first failure aborts.
pub fn load_inputs(
    loader: &dyn SourceLoader,
    dictionary: &Source,
    schema: &Source,
    columns: &ColumnsConfig,
) -> Result<Inputs> {
    let table = loader.fetch_named("dictionary", dictionary)?;
    let rows = parse_dictionary(&table, columns)?;
    tracing::info!(rows = rows.len(), "loaded data dictionary");

    let xml = loader.fetch_named("schema", schema)?;
    let keys = extract_primary_keys(&xml);
    tracing::info!(keys = keys.len(), "loaded schema keys");

    Ok(Inputs { rows, keys })
}

/// The full view and, when requested, the orphan-excluded view
#[derive(Debug, Clone)]
pub struct Derived {
    pub full: ErdView,
    pub connected: Option<ErdView>,
}

impl Derived {
    /// Views in the order their artifacts are written
    pub fn views(&self) -> impl Iterator<Item = &ErdView> {
        std::iter::once(&self.full).chain(self.connected.as_ref())
    }
}

pub fn derive(inputs: &Inputs, exclude_orphans: bool) -> Derived {
    let full = ErdView::build(&inputs.rows, &inputs.keys);
    let connected = exclude_orphans.then(|| full.connected_only());
    Derived { full, connected }
}

/// Reject ambiguous key declarations and colliding diagram identifiers
pub fn check_strict(view: &ErdView) -> Result<()> {
    let ambiguous: Vec<_> = view
        .diagnostics
        .iter()
        .filter(|d| d.is_ambiguity() || d.is_collision())
        .collect();
    match ambiguous.first() {
        Some(first) => Err(ErdError::Strict {
            count: ambiguous.len(),
            first: first.to_string(),
        }),
        None => Ok(()),
    }
}
