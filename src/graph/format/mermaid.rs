//! Mermaid erDiagram format output.

use crate::graph::view::ErdView;

/// Every key attribute is rendered as a plain string column
const KEY_TYPE: &str = "string";

/// Many referencing rows, exactly one referenced row
const MANY_TO_ONE: &str = "}o--||";

/// Generate Mermaid erDiagram from a view
pub fn to_mermaid(view: &ErdView) -> String {
    let mut output = String::new();

    output.push_str("erDiagram\n");

    for entity in view.drawn_entities() {
        output.push_str(&format!("    {} {{\n", mermaid_id(&entity.name)));

        if let Some(pk) = &entity.primary_key {
            output.push_str(&format!(
                "        {} {} PK\n",
                KEY_TYPE,
                mermaid_id(pk)
            ));
        }

        for fk in &entity.foreign_keys {
            output.push_str(&format!(
                "        {} {} FK\n",
                KEY_TYPE,
                mermaid_id(&fk.name)
            ));
        }

        output.push_str("    }\n");
    }

    if !view.relationships.is_empty() {
        output.push('\n');
    }

    for rel in &view.relationships {
        output.push_str(&format!(
            "    {} {} {} : \"{}\"\n",
            mermaid_id(&rel.from),
            MANY_TO_ONE,
            mermaid_id(&rel.to),
            escape_label(&rel.field)
        ));
    }

    output
}

/// Escape a string for use as a Mermaid entity ID
pub(crate) fn mermaid_id(s: &str) -> String {
    // Mermaid IDs should be alphanumeric with underscores
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Relationship labels are quoted, so only the quote itself needs replacing
fn escape_label(s: &str) -> String {
    s.replace('"', "'")
}
