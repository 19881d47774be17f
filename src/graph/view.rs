//! The derived ERD: entities, resolved relationships and diagnostics.

use super::analysis::{connected_names, resolve_relationships};
use super::builder::build_entities;
use super::format::mermaid::mermaid_id;
use super::model::{Diagnostic, Entity, EntityMap, Relationship};
use crate::dictionary::DictionaryRow;
use crate::schema::PrimaryKeys;
use indexmap::IndexMap;

/// Which entities a view keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Every resource, orphans included
    #[default]
    Full,
    /// Only entities that own a foreign key or are referenced
    Connected,
}

/// Entities and relationships ready for rendering
#[derive(Debug, Clone)]
pub struct ErdView {
    /// Entities in first-seen order
    pub entities: EntityMap,
    /// Edges in entity order, then foreign key order
    pub relationships: Vec<Relationship>,
    pub diagnostics: Vec<Diagnostic>,
    pub scope: Scope,
    /// Entities dropped by the orphan filter
    pub excluded: usize,
}

/// Entity names that map to one diagram identifier, in first-seen order
fn id_collisions(entities: &EntityMap) -> Vec<Diagnostic> {
    let mut by_id: IndexMap<String, Vec<String>> = IndexMap::new();
    for name in entities.keys() {
        by_id.entry(mermaid_id(name)).or_default().push(name.clone());
    }
    by_id
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(id, entities)| Diagnostic::IdCollision { id, entities })
        .collect()
}

impl ErdView {
    /// Run the full derivation over dictionary rows and schema keys
    pub fn build(rows: &[DictionaryRow], keys: &PrimaryKeys) -> Self {
        let entities = build_entities(rows, keys);
        let mut view = Self::from_entities(entities);

        let mut diagnostics: Vec<Diagnostic> = keys
            .duplicates()
            .iter()
            .map(|d| Diagnostic::DuplicateResource {
                resource: d.resource.clone(),
                previous: d.previous.clone(),
                current: d.current.clone(),
            })
            .collect();
        diagnostics.append(&mut view.diagnostics);
        view.diagnostics = diagnostics;

        for diagnostic in &view.diagnostics {
            match diagnostic {
                Diagnostic::AmbiguousPrimaryKey { .. } => {
                    tracing::warn!("ambiguous primary key {}", diagnostic)
                }
                Diagnostic::IdCollision { .. } => tracing::warn!("{}", diagnostic),
                // Already reported by the key extractor
                Diagnostic::DuplicateResource { .. } => {}
                _ => tracing::debug!("{}", diagnostic),
            }
        }

        view
    }

    /// Resolve relationships over an existing entity set
    pub fn from_entities(entities: EntityMap) -> Self {
        let resolution = resolve_relationships(&entities);

        let mut diagnostics: Vec<Diagnostic> = entities
            .values()
            .filter(|e| e.primary_key.is_none())
            .map(|e| Diagnostic::MissingPrimaryKey {
                resource: e.name.clone(),
            })
            .collect();
        diagnostics.extend(resolution.diagnostics);
        diagnostics.extend(id_collisions(&entities));

        Self {
            entities,
            relationships: resolution.relationships,
            diagnostics,
            scope: Scope::Full,
            excluded: 0,
        }
    }

    /// Restrict to connected entities, preserving order.
    ///
    /// Relationships are recomputed over the kept entities.
    pub fn connected_only(&self) -> Self {
        let keep = connected_names(&self.entities, &self.relationships);
        let entities: EntityMap = self
            .entities
            .iter()
            .filter(|(name, _)| keep.contains(name.as_str()))
            .map(|(name, entity)| (name.clone(), entity.clone()))
            .collect();

        let excluded = self.entities.len() - entities.len();
        let mut view = Self::from_entities(entities);
        view.scope = Scope::Connected;
        view.excluded = excluded;
        view
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn edge_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn entities_with_primary_key(&self) -> usize {
        self.entities
            .values()
            .filter(|e| e.primary_key.is_some())
            .count()
    }

    pub fn dangling_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::DanglingForeignKey { .. }))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get_entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    /// Whether an entity gets a block in the diagram. Entities with no
    /// attributes and no relationships are only drawn in the full view.
    pub fn is_drawn(&self, entity: &Entity) -> bool {
        if self.scope == Scope::Full || entity.attribute_count() > 0 {
            return true;
        }
        self.relationships
            .iter()
            .any(|r| r.from == entity.name || r.to == entity.name)
    }

    /// Entities that get a block, in order
    pub fn drawn_entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values().filter(|e| self.is_drawn(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<DictionaryRow> {
        vec![
            DictionaryRow::new("Property", "ListingKey", None),
            DictionaryRow::new("Property", "ListOfficeKey", Some("OfficeKey")),
            DictionaryRow::new("Property", "BuyerTeamKey", Some("TeamKey")),
            DictionaryRow::new("Member", "MemberKey", None),
            DictionaryRow::new("Office", "OfficeKey", None),
            DictionaryRow::new("Lookup", "LookupName", None),
        ]
    }

    fn keys() -> PrimaryKeys {
        [
            ("Property", "ListingKey"),
            ("Member", "MemberKey"),
            ("Office", "OfficeKey"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_build_counts() {
        let view = ErdView::build(&rows(), &keys());
        assert_eq!(view.entity_count(), 4);
        assert_eq!(view.entities_with_primary_key(), 3);
        assert_eq!(view.edge_count(), 1);
        assert_eq!(view.dangling_count(), 1);
        assert_eq!(view.scope, Scope::Full);
        assert!(view
            .diagnostics
            .contains(&Diagnostic::MissingPrimaryKey {
                resource: "Lookup".to_string()
            }));
    }

    #[test]
    fn test_connected_only() {
        let view = ErdView::build(&rows(), &keys());
        let connected = view.connected_only();

        let names: Vec<_> = connected.entities.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Property", "Office"]);
        assert_eq!(connected.excluded, 2);
        assert_eq!(connected.scope, Scope::Connected);
        assert_eq!(connected.relationships, view.relationships);
    }

    #[test]
    fn test_duplicate_declarations_surface_first() {
        let mut keys = keys();
        keys.declare("Office", "OfficeMlsId");
        let view = ErdView::build(&rows(), &keys);
        assert!(matches!(
            view.diagnostics[0],
            Diagnostic::DuplicateResource { ref resource, .. } if resource == "Office"
        ));
        // the overwritten key no longer resolves
        assert_eq!(view.edge_count(), 0);
    }

    #[test]
    fn test_empty_entities_only_drawn_in_full_view() {
        let mut entities = EntityMap::new();
        entities.insert("Lookup".to_string(), Entity::new("Lookup", None));
        let mut view = ErdView::from_entities(entities);
        let lookup = view.get_entity("Lookup").unwrap().clone();

        assert!(view.is_drawn(&lookup));
        view.scope = Scope::Connected;
        assert!(!view.is_drawn(&lookup));
        assert_eq!(view.drawn_entities().count(), 0);
    }

    #[test]
    fn test_colliding_identifiers_are_diagnosed() {
        let rows = vec![
            DictionaryRow::new("Open House", "OpenHouseKey", None),
            DictionaryRow::new("Property", "ListingKey", None),
            DictionaryRow::new("Open_House", "OpenHouseKey", None),
        ];
        let view = ErdView::build(&rows, &PrimaryKeys::new());
        assert!(view.diagnostics.contains(&Diagnostic::IdCollision {
            id: "Open_House".to_string(),
            entities: vec!["Open House".to_string(), "Open_House".to_string()],
        }));
        assert_eq!(view.diagnostics.iter().filter(|d| d.is_collision()).count(), 1);
    }
}
