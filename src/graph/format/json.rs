//! JSON format output for ERD data.

use super::DocumentMeta;
use crate::graph::view::ErdView;
use schemars::JsonSchema;
use serde::Serialize;

/// JSON representation of the ERD
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErdJson {
    pub title: String,
    pub entities: Vec<EntityJson>,
    pub relationships: Vec<RelationshipJson>,
    pub stats: ErdStats,
}

/// JSON representation of an entity with its keys
#[derive(Debug, Serialize, JsonSchema)]
pub struct EntityJson {
    pub name: String,
    /// Null when the schema declares no key
    pub primary_key: Option<String>,
    pub foreign_keys: Vec<ForeignKeyJson>,
}

/// JSON representation of a foreign key attribute
#[derive(Debug, Serialize, JsonSchema)]
pub struct ForeignKeyJson {
    pub name: String,
    pub target_resource: String,
}

/// JSON representation of a relationship
#[derive(Debug, Serialize, JsonSchema)]
pub struct RelationshipJson {
    pub from: String,
    pub to: String,
    pub field: String,
}

/// ERD statistics
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErdStats {
    pub entity_count: usize,
    pub entities_with_primary_key: usize,
    pub relationship_count: usize,
    pub dangling_foreign_key_count: usize,
    pub orphans_excluded: usize,
}

/// Generate JSON output from a view
pub fn to_json(view: &ErdView, meta: &DocumentMeta) -> String {
    let erd = build_erd_json(view, meta);
    let mut output = serde_json::to_string_pretty(&erd).unwrap_or_else(|_| "{}".to_string());
    output.push('\n');
    output
}

/// Build the JSON structure
pub fn build_erd_json(view: &ErdView, meta: &DocumentMeta) -> ErdJson {
    let entities: Vec<EntityJson> = view
        .drawn_entities()
        .map(|entity| EntityJson {
            name: entity.name.clone(),
            primary_key: entity.primary_key.clone(),
            foreign_keys: entity
                .foreign_keys
                .iter()
                .map(|fk| ForeignKeyJson {
                    name: fk.name.clone(),
                    target_resource: fk.target_resource.clone().unwrap_or_default(),
                })
                .collect(),
        })
        .collect();

    let relationships: Vec<RelationshipJson> = view
        .relationships
        .iter()
        .map(|r| RelationshipJson {
            from: r.from.clone(),
            to: r.to.clone(),
            field: r.field.clone(),
        })
        .collect();

    ErdJson {
        title: meta.title.clone(),
        entities,
        relationships,
        stats: ErdStats {
            entity_count: view.entity_count(),
            entities_with_primary_key: view.entities_with_primary_key(),
            relationship_count: view.edge_count(),
            dangling_foreign_key_count: view.dangling_count(),
            orphans_excluded: view.excluded,
        },
    }
}
