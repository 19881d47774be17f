//! Entity, field and relationship types for ERD derivation.

use indexmap::IndexMap;
use std::fmt;

/// One key attribute of a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Standard field name
    pub name: String,
    /// Key name of the referenced resource, if this is a foreign key
    pub target_resource: Option<String>,
}

impl Field {
    pub fn foreign_key(name: &str, target: &str) -> Self {
        Self {
            name: name.to_string(),
            target_resource: Some(target.to_string()),
        }
    }

    pub fn is_foreign_key(&self) -> bool {
        self.target_resource.is_some()
    }
}

/// A resource with its key attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    /// `None` when the schema declares no key for this resource
    pub primary_key: Option<String>,
    /// Foreign keys in declaration order, duplicates kept
    pub foreign_keys: Vec<Field>,
}

impl Entity {
    pub fn new(name: &str, primary_key: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            primary_key: primary_key.map(str::to_string),
            foreign_keys: Vec::new(),
        }
    }

    pub fn with_foreign_key(mut self, name: &str, target: &str) -> Self {
        self.foreign_keys.push(Field::foreign_key(name, target));
        self
    }

    /// Number of attribute lines this entity renders
    pub fn attribute_count(&self) -> usize {
        usize::from(self.primary_key.is_some()) + self.foreign_keys.len()
    }
}

/// Entities keyed by resource name, in first-seen order
pub type EntityMap = IndexMap<String, Entity>;

/// Many rows of `from` reference one row of `to` through `field`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relationship {
    pub from: String,
    pub to: String,
    pub field: String,
}

impl Relationship {
    pub fn new(from: &str, to: &str, field: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            field: field.to_string(),
        }
    }
}

/// Non-fatal data problem found while deriving the diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Resource absent from the schema; rendered without a PK line
    MissingPrimaryKey { resource: String },
    /// Resource declared twice in the schema; the later key was kept
    DuplicateResource {
        resource: String,
        previous: String,
        current: String,
    },
    /// Several entities share a primary key name; references resolve to the last one
    AmbiguousPrimaryKey {
        key: String,
        entities: Vec<String>,
        resolved_to: String,
    },
    /// Foreign key target matches no known primary key; no edge is drawn
    DanglingForeignKey {
        entity: String,
        field: String,
        target: String,
    },
    /// Distinct entity names that render to the same diagram identifier
    IdCollision { id: String, entities: Vec<String> },
}

impl Diagnostic {
    /// Whether this diagnostic makes relationship resolution order-dependent
    pub fn is_ambiguity(&self) -> bool {
        matches!(
            self,
            Diagnostic::DuplicateResource { .. } | Diagnostic::AmbiguousPrimaryKey { .. }
        )
    }

    /// Whether several entities would be merged into one diagram block
    pub fn is_collision(&self) -> bool {
        matches!(self, Diagnostic::IdCollision { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingPrimaryKey { resource } => {
                write!(f, "{}: no primary key in schema", resource)
            }
            Diagnostic::DuplicateResource {
                resource,
                previous,
                current,
            } => write!(
                f,
                "{}: declared twice in schema ({} replaced by {})",
                resource, previous, current
            ),
            Diagnostic::AmbiguousPrimaryKey {
                key,
                entities,
                resolved_to,
            } => write!(
                f,
                "{}: primary key of {} (references resolve to {})",
                key,
                entities.join(", "),
                resolved_to
            ),
            Diagnostic::DanglingForeignKey {
                entity,
                field,
                target,
            } => write!(f, "{}.{}: no entity owns {}", entity, field, target),
            Diagnostic::IdCollision { id, entities } => write!(
                f,
                "{}: diagram identifier shared by {}",
                id,
                entities.join(", ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_count() {
        assert_eq!(Entity::new("Member", None).attribute_count(), 0);
        assert_eq!(Entity::new("Member", Some("MemberKey")).attribute_count(), 1);
        let property = Entity::new("Property", Some("ListingKey"))
            .with_foreign_key("ListOfficeKey", "OfficeKey")
            .with_foreign_key("ListAgentKey", "MemberKey");
        assert_eq!(property.attribute_count(), 3);
    }

    #[test]
    fn test_unknown_is_a_real_key_name() {
        let entity = Entity::new("Odd", Some("unknown"));
        assert_eq!(entity.primary_key.as_deref(), Some("unknown"));
        assert_eq!(entity.attribute_count(), 1);
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::DanglingForeignKey {
            entity: "Property".to_string(),
            field: "ListOfficeKey".to_string(),
            target: "OfficeKey".to_string(),
        };
        assert_eq!(d.to_string(), "Property.ListOfficeKey: no entity owns OfficeKey");
        assert!(!d.is_ambiguity());

        let d = Diagnostic::AmbiguousPrimaryKey {
            key: "MemberKey".to_string(),
            entities: vec!["Member".to_string(), "Agent".to_string()],
            resolved_to: "Agent".to_string(),
        };
        assert!(d.to_string().contains("Member, Agent"));
        assert!(d.is_ambiguity());
    }

    #[test]
    fn test_collision_display() {
        let d = Diagnostic::IdCollision {
            id: "Open_House".to_string(),
            entities: vec!["Open House".to_string(), "Open_House".to_string()],
        };
        assert_eq!(
            d.to_string(),
            "Open_House: diagram identifier shared by Open House, Open_House"
        );
        assert!(d.is_collision());
        assert!(!d.is_ambiguity());
    }
}
