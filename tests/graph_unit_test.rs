//! Library-level tests for ERD derivation on the bundled fixtures.

use reso_erd::config::ColumnsConfig;
use reso_erd::dictionary::{parse_dictionary, DictionaryRow};
use reso_erd::graph::{
    connected_names, render_document, to_mermaid, Diagnostic, DocumentMeta, ErdView,
    OutputFormat, Relationship,
};
use reso_erd::pipeline::{derive, load_inputs, Inputs};
use reso_erd::schema::{extract_primary_keys, PrimaryKeys};
use reso_erd::source::{FileLoader, Source};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_inputs() -> Inputs {
    load_inputs(
        &FileLoader,
        &Source::Path(fixture("dictionary.csv")),
        &Source::Path(fixture("schema.xml")),
        &ColumnsConfig::default(),
    )
    .unwrap()
}

#[test]
fn test_fixture_entities_in_first_seen_order() {
    let inputs = fixture_inputs();
    let view = ErdView::build(&inputs.rows, &inputs.keys);
    let names: Vec<_> = view.entities.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        vec!["Property", "Member", "Office", "OpenHouse", "Lookup", "Field"]
    );
    assert_eq!(view.entities_with_primary_key(), 5);
    assert_eq!(view.get_entity("Field").unwrap().primary_key, None);
}

#[test]
fn test_fixture_relationships() {
    let derived = derive(&fixture_inputs(), false);
    assert_eq!(
        derived.full.relationships,
        vec![
            Relationship::new("Property", "Office", "ListOfficeKey"),
            Relationship::new("Property", "Member", "ListAgentKey"),
            Relationship::new("Member", "Office", "OfficeKey"),
            Relationship::new("OpenHouse", "Property", "ListingKey"),
        ]
    );
    assert_eq!(derived.full.dangling_count(), 1);
    assert!(derived.full.diagnostics.contains(&Diagnostic::DanglingForeignKey {
        entity: "Property".to_string(),
        field: "BuyerTeamKey".to_string(),
        target: "TeamKey".to_string(),
    }));
}

#[test]
fn test_fixture_orphan_filter() {
    let derived = derive(&fixture_inputs(), true);
    let connected = derived.connected.unwrap();
    let names: Vec<_> = connected.entities.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Property", "Member", "Office", "OpenHouse"]);
    assert_eq!(connected.excluded, 2);
    assert_eq!(connected.relationships, derived.full.relationships);
}

#[test]
fn test_orphan_filter_membership_rule() {
    let derived = derive(&fixture_inputs(), false);
    let full = &derived.full;
    let connected = connected_names(&full.entities, &full.relationships);

    for entity in full.entities.values() {
        let owns_fk = !entity.foreign_keys.is_empty();
        let is_target = full.relationships.iter().any(|r| r.to == entity.name);
        assert_eq!(
            connected.contains(&entity.name),
            owns_fk || is_target,
            "{}",
            entity.name
        );
    }
}

#[test]
fn test_every_resolvable_foreign_key_has_one_edge() {
    let derived = derive(&fixture_inputs(), false);
    let full = &derived.full;

    for entity in full.entities.values() {
        for fk in &entity.foreign_keys {
            let resolvable = full
                .entities
                .values()
                .any(|e| e.primary_key.as_deref() == fk.target_resource.as_deref());
            let edges = full
                .relationships
                .iter()
                .filter(|r| r.from == entity.name && r.field == fk.name)
                .count();
            assert_eq!(edges, usize::from(resolvable), "{}.{}", entity.name, fk.name);
        }
    }
}

#[test]
fn test_rendering_is_idempotent() {
    let meta = DocumentMeta::new("RESO Simple ERD", "Keys only.");
    let first = render_document(&derive(&fixture_inputs(), false).full, &meta, OutputFormat::Markdown);
    let second = render_document(&derive(&fixture_inputs(), false).full, &meta, OutputFormat::Markdown);
    assert_eq!(first, second);

    let first = render_document(&derive(&fixture_inputs(), true).full, &meta, OutputFormat::Json);
    let second = render_document(&derive(&fixture_inputs(), true).full, &meta, OutputFormat::Json);
    assert_eq!(first, second);
}

#[test]
fn test_dangling_example() {
    // Property points at OfficeKey, which no entity owns
    let rows = vec![
        DictionaryRow::new("Property", "ListOfficeKey", Some("OfficeKey")),
        DictionaryRow::new("Member", "MemberKey", None),
    ];
    let keys: PrimaryKeys = [("Property", "ListingKey"), ("Member", "MemberKey")]
        .into_iter()
        .collect();
    let view = ErdView::build(&rows, &keys);
    let output = to_mermaid(&view);

    assert!(output.contains("    Property {\n        string ListingKey PK\n        string ListOfficeKey FK\n    }\n"));
    assert!(view.relationships.is_empty());
    assert!(!output.contains("}o--||"));

    let connected = view.connected_only();
    assert!(connected.get_entity("Member").is_none());
    assert!(connected.get_entity("Property").is_some());
}

#[test]
fn test_resolved_example() {
    let rows = vec![
        DictionaryRow::new("Property", "ListOfficeKey", Some("OfficeKey")),
        DictionaryRow::new("Office", "OfficeKey", None),
    ];
    let keys: PrimaryKeys = [("Property", "ListingKey"), ("Office", "OfficeKey")]
        .into_iter()
        .collect();
    let output = to_mermaid(&ErdView::build(&rows, &keys));

    assert_eq!(output.matches("}o--||").count(), 1);
    assert!(output.contains("    Property }o--|| Office : \"ListOfficeKey\"\n"));
}

#[test]
fn test_parse_and_extract_directly() {
    let csv = std::fs::read_to_string(fixture("dictionary.csv")).unwrap();
    let xml = std::fs::read_to_string(fixture("schema.xml")).unwrap();

    let rows = parse_dictionary(&csv, &ColumnsConfig::default()).unwrap();
    let keys = extract_primary_keys(&xml);

    assert_eq!(rows.len(), 13);
    assert_eq!(keys.len(), 5);
    assert_eq!(keys.get("OpenHouse"), Some("OpenHouseKey"));
}
