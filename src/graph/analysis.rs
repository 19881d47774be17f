//! Relationship resolution and orphan detection.

use super::model::{Diagnostic, EntityMap, Relationship};
use ahash::{AHashMap, AHashSet};

/// Primary key name to the entity its references resolve to
#[derive(Debug, Default)]
pub struct KeyIndex {
    owners: AHashMap<String, String>,
    /// Keys owned by more than one entity, in first-claimed order
    shared: Vec<(String, Vec<String>)>,
}

impl KeyIndex {
    /// Index every entity with a known primary key. When several entities
    /// share a key name, the one latest in iteration order owns it.
    pub fn build(entities: &EntityMap) -> Self {
        let mut claims: AHashMap<&str, Vec<&str>> = AHashMap::new();
        let mut order: Vec<&str> = Vec::new();

        for entity in entities.values() {
            let Some(pk) = entity.primary_key.as_deref() else {
                continue;
            };
            let claimants = claims.entry(pk).or_insert_with(|| {
                order.push(pk);
                Vec::new()
            });
            claimants.push(&entity.name);
        }

        let mut index = KeyIndex::default();
        for pk in order {
            let Some(claimants) = claims.get(pk) else {
                continue;
            };
            if let Some(last) = claimants.last() {
                index.owners.insert(pk.to_string(), (*last).to_string());
            }
            if claimants.len() > 1 {
                index.shared.push((
                    pk.to_string(),
                    claimants.iter().map(|c| c.to_string()).collect(),
                ));
            }
        }
        index
    }

    /// Entity that owns the given key name
    pub fn owner(&self, key: &str) -> Option<&str> {
        self.owners.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// One diagnostic per key name claimed by several entities
    pub fn ambiguities(&self) -> Vec<Diagnostic> {
        self.shared
            .iter()
            .map(|(key, entities)| Diagnostic::AmbiguousPrimaryKey {
                key: key.clone(),
                entities: entities.clone(),
                resolved_to: self.owners.get(key).cloned().unwrap_or_default(),
            })
            .collect()
    }
}

/// Result of joining foreign keys against known primary keys
#[derive(Debug, Default)]
pub struct Resolution {
    /// Edges in entity order, then foreign key declaration order
    pub relationships: Vec<Relationship>,
    /// Ambiguous keys and dangling references
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    pub fn dangling_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::DanglingForeignKey { .. }))
            .count()
    }
}

/// Resolve every foreign key to the entity owning the matching primary key.
///
/// A foreign key whose target matches no primary key produces no edge and a
/// `DanglingForeignKey` diagnostic; it is not an error.
pub fn resolve_relationships(entities: &EntityMap) -> Resolution {
    let index = KeyIndex::build(entities);
    let mut resolution = Resolution {
        diagnostics: index.ambiguities(),
        ..Resolution::default()
    };

    for entity in entities.values() {
        for fk in &entity.foreign_keys {
            let Some(target) = fk.target_resource.as_deref() else {
                continue;
            };
            match index.owner(target) {
                Some(owner) => resolution
                    .relationships
                    .push(Relationship::new(&entity.name, owner, &fk.name)),
                None => resolution.diagnostics.push(Diagnostic::DanglingForeignKey {
                    entity: entity.name.clone(),
                    field: fk.name.clone(),
                    target: target.to_string(),
                }),
            }
        }
    }

    resolution
}

/// Names of entities that own a foreign key or are the target of an edge.
///
/// Owning a foreign key is enough even if every one of them dangles.
pub fn connected_names(entities: &EntityMap, relationships: &[Relationship]) -> AHashSet<String> {
    let mut connected: AHashSet<String> = entities
        .values()
        .filter(|e| !e.foreign_keys.is_empty())
        .map(|e| e.name.clone())
        .collect();

    for rel in relationships {
        if entities.contains_key(&rel.to) {
            connected.insert(rel.to.clone());
        }
    }

    connected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::Entity;

    fn entities(list: Vec<Entity>) -> EntityMap {
        list.into_iter().map(|e| (e.name.clone(), e)).collect()
    }

    #[test]
    fn test_resolves_edge_to_key_owner() {
        let map = entities(vec![
            Entity::new("Property", Some("ListingKey")).with_foreign_key("ListOfficeKey", "OfficeKey"),
            Entity::new("Office", Some("OfficeKey")),
        ]);
        let resolution = resolve_relationships(&map);

        assert_eq!(
            resolution.relationships,
            vec![Relationship::new("Property", "Office", "ListOfficeKey")]
        );
        assert!(resolution.diagnostics.is_empty());
    }

    #[test]
    fn test_dangling_reference_is_diagnostic() {
        let map = entities(vec![
            Entity::new("Property", Some("ListingKey")).with_foreign_key("ListOfficeKey", "OfficeKey"),
            Entity::new("Member", Some("MemberKey")),
        ]);
        let resolution = resolve_relationships(&map);

        assert!(resolution.relationships.is_empty());
        assert_eq!(resolution.dangling_count(), 1);
        assert_eq!(
            resolution.diagnostics[0],
            Diagnostic::DanglingForeignKey {
                entity: "Property".to_string(),
                field: "ListOfficeKey".to_string(),
                target: "OfficeKey".to_string(),
            }
        );
    }

    #[test]
    fn test_entities_without_key_are_not_targets() {
        let map = entities(vec![
            Entity::new("Property", None).with_foreign_key("X", "unknown"),
            Entity::new("Other", None),
        ]);
        let resolution = resolve_relationships(&map);
        assert!(resolution.relationships.is_empty());
        assert_eq!(resolution.dangling_count(), 1);
    }

    #[test]
    fn test_shared_key_resolves_to_later_entity() {
        let map = entities(vec![
            Entity::new("Member", Some("MemberKey")),
            Entity::new("Property", Some("ListingKey")).with_foreign_key("ListAgentKey", "MemberKey"),
            Entity::new("Agent", Some("MemberKey")),
        ]);
        let resolution = resolve_relationships(&map);

        assert_eq!(
            resolution.relationships,
            vec![Relationship::new("Property", "Agent", "ListAgentKey")]
        );
        assert_eq!(
            resolution.diagnostics,
            vec![Diagnostic::AmbiguousPrimaryKey {
                key: "MemberKey".to_string(),
                entities: vec!["Member".to_string(), "Agent".to_string()],
                resolved_to: "Agent".to_string(),
            }]
        );
    }

    #[test]
    fn test_edge_order_follows_entities_then_fields() {
        let map = entities(vec![
            Entity::new("Office", Some("OfficeKey")).with_foreign_key("OfficeBrokerKey", "MemberKey"),
            Entity::new("Property", Some("ListingKey"))
                .with_foreign_key("ListOfficeKey", "OfficeKey")
                .with_foreign_key("ListAgentKey", "MemberKey"),
            Entity::new("Member", Some("MemberKey")),
        ]);
        let rels = resolve_relationships(&map).relationships;
        let fields: Vec<_> = rels.iter().map(|r| r.field.as_str()).collect();
        assert_eq!(fields, vec!["OfficeBrokerKey", "ListOfficeKey", "ListAgentKey"]);
    }

    #[test]
    fn test_self_reference() {
        let map = entities(vec![
            Entity::new("Member", Some("MemberKey")).with_foreign_key("SupervisorMemberKey", "MemberKey"),
        ]);
        let rels = resolve_relationships(&map).relationships;
        assert_eq!(rels, vec![Relationship::new("Member", "Member", "SupervisorMemberKey")]);
    }

    #[test]
    fn test_connected_names() {
        let map = entities(vec![
            Entity::new("Property", Some("ListingKey")).with_foreign_key("ListOfficeKey", "OfficeKey"),
            Entity::new("Office", Some("OfficeKey")),
            Entity::new("Media", Some("MediaKey")).with_foreign_key("ResourceRecordKey", "Nothing"),
            Entity::new("Lonely", Some("LonelyKey")),
            Entity::new("NoKey", None),
        ]);
        let rels = resolve_relationships(&map).relationships;
        let connected = connected_names(&map, &rels);

        assert!(connected.contains("Property"));
        assert!(connected.contains("Office"));
        assert!(connected.contains("Media"));
        assert!(!connected.contains("Lonely"));
        assert!(!connected.contains("NoKey"));
        assert_eq!(connected.len(), 3);
    }

    #[test]
    fn test_key_index_ignores_missing_keys() {
        let map = entities(vec![Entity::new("A", None), Entity::new("B", Some("BKey"))]);
        let index = KeyIndex::build(&map);
        assert_eq!(index.len(), 1);
        assert_eq!(index.owner("BKey"), Some("B"));
        assert!(index.ambiguities().is_empty());
    }
}
