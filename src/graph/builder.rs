//! Entity construction from dictionary rows.

use super::model::{Entity, EntityMap, Field};
use crate::dictionary::DictionaryRow;
use crate::schema::PrimaryKeys;

/// Group rows by resource and attach primary keys.
///
/// Resources appear in first-seen order. Every non-empty resource name yields
/// exactly one entity, even when none of its rows name a field. Rows without a
/// field name are skipped; a row is a foreign key when its target is non-blank.
pub fn build_entities(rows: &[DictionaryRow], keys: &PrimaryKeys) -> EntityMap {
    let mut entities = EntityMap::new();

    for row in rows {
        let resource = row.resource.trim();
        if resource.is_empty() {
            continue;
        }

        let entity = entities
            .entry(resource.to_string())
            .or_insert_with(|| Entity::new(resource, keys.get(resource)));

        let field = row.field.trim();
        if field.is_empty() || field == "nan" {
            continue;
        }

        let target = row.target.as_deref().map(str::trim).filter(|t| !t.is_empty());
        if let Some(target) = target {
            entity.foreign_keys.push(Field::foreign_key(field, target));
        }
    }

    for entity in entities.values() {
        tracing::debug!(
            entity = %entity.name,
            pk = entity.primary_key.as_deref().unwrap_or("-"),
            fks = entity.foreign_keys.len(),
            "built entity"
        );
    }

    entities
}
