//! Operator-facing summary of a run.

use super::model::Diagnostic;
use super::view::ErdView;

/// Counts printed after generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErdReport {
    pub total_entities: usize,
    pub entities_with_primary_key: usize,
    pub relationships: usize,
    pub dangling_foreign_keys: usize,
    /// Set only when the orphan filter ran
    pub orphans_excluded: Option<usize>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ErdReport {
    pub fn new(full: &ErdView, connected: Option<&ErdView>) -> Self {
        Self {
            total_entities: full.entity_count(),
            entities_with_primary_key: full.entities_with_primary_key(),
            relationships: full.edge_count(),
            dangling_foreign_keys: full.dangling_count(),
            orphans_excluded: connected.map(|c| c.excluded),
            diagnostics: full.diagnostics.clone(),
        }
    }

    /// Diagnostics that make resolution depend on declaration order
    pub fn ambiguities(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_ambiguity())
    }

    /// Entity names merged into a single diagram block
    pub fn collisions(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_collision())
    }

    /// Summary lines, one fact each
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Total entities: {}", self.total_entities),
            format!("Entities with PKs: {}", self.entities_with_primary_key),
            format!("Total relationships: {}", self.relationships),
        ];
        if self.dangling_foreign_keys > 0 {
            lines.push(format!(
                "Unresolved foreign keys: {}",
                self.dangling_foreign_keys
            ));
        }
        if let Some(excluded) = self.orphans_excluded {
            lines.push(format!("Orphaned entities excluded: {}", excluded));
        }
        let ambiguous = self.ambiguities().count();
        if ambiguous > 0 {
            lines.push(format!("Ambiguous key declarations: {}", ambiguous));
        }
        let collisions = self.collisions().count();
        if collisions > 0 {
            lines.push(format!("Colliding diagram identifiers: {}", collisions));
        }
        lines
    }
}
