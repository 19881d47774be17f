//! Primary key extraction from the OData XML schema.
//!
//! Each `<EntityType Name="...">` block declares its key as
//! `<Key><PropertyRef Name="..." /></Key>`. Parsing is regex based: the
//! document is large and only these two elements are of interest.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

/// Opening tag of an entity type, capturing its attributes and self-closing slash
static ENTITY_TYPE_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<EntityType\b([^>]*?)(/?)>").unwrap());

/// Name attribute inside a tag
static NAME_ATTR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\bName\s*=\s*"([^"]*)""#).unwrap());

/// Key block with its first property reference
static KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<Key\s*>\s*<PropertyRef\s+Name\s*=\s*"([^"]*)"\s*/?>"#).unwrap()
});

const ENTITY_TYPE_CLOSE: &str = "</EntityType>";

/// A resource declared more than once; the later key won
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateDeclaration {
    pub resource: String,
    pub previous: String,
    pub current: String,
}

/// Resource name to primary key field, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimaryKeys {
    keys: IndexMap<String, String>,
    duplicates: Vec<DuplicateDeclaration>,
}

impl PrimaryKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a declaration. A repeated resource overwrites the earlier key
    /// and is remembered as a duplicate.
    pub fn declare(&mut self, resource: &str, key: &str) {
        if let Some(previous) = self.keys.insert(resource.to_string(), key.to_string()) {
            self.duplicates.push(DuplicateDeclaration {
                resource: resource.to_string(),
                previous,
                current: key.to_string(),
            });
        }
    }

    pub fn get(&self, resource: &str) -> Option<&str> {
        self.keys.get(resource).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys.iter().map(|(r, k)| (r.as_str(), k.as_str()))
    }

    /// Declarations that overwrote an earlier one
    pub fn duplicates(&self) -> &[DuplicateDeclaration] {
        &self.duplicates
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for PrimaryKeys {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut keys = PrimaryKeys::new();
        for (resource, key) in iter {
            keys.declare(resource, key);
        }
        keys
    }
}

/// Extract primary keys from schema text.
///
/// Entity types without a key block produce no entry. The scan for a key
/// never crosses into the next entity type.
pub fn extract_primary_keys(xml: &str) -> PrimaryKeys {
    let mut keys = PrimaryKeys::new();

    for open in ENTITY_TYPE_OPEN_RE.captures_iter(xml) {
        let (Some(whole), Some(attrs)) = (open.get(0), open.get(1)) else {
            continue;
        };
        let Some(name) = NAME_ATTR_RE
            .captures(attrs.as_str())
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
        else {
            continue;
        };

        if open.get(2).is_some_and(|m| !m.as_str().is_empty()) {
            tracing::debug!(resource = name, "entity type has no body");
            continue;
        }

        let rest = &xml[whole.end()..];
        let body = rest.find(ENTITY_TYPE_CLOSE).map_or(rest, |end| &rest[..end]);

        match KEY_RE.captures(body).and_then(|c| c.get(1)) {
            Some(key) => keys.declare(name, key.as_str()),
            None => tracing::debug!(resource = name, "entity type declares no key"),
        }
    }

    for dup in keys.duplicates() {
        tracing::warn!(
            resource = %dup.resource,
            previous = %dup.previous,
            current = %dup.current,
            "resource declared more than once in schema, keeping the later key"
        );
    }

    keys
}
