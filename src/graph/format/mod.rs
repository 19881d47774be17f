//! Output format implementations for ERD artifacts.

pub(crate) mod json;
pub(crate) mod mermaid;

pub use json::to_json;
pub use mermaid::to_mermaid;
#[allow(unused_imports)]
pub use json::{EntityJson, ErdJson, ErdStats, ForeignKeyJson, RelationshipJson};

use crate::graph::view::ErdView;
use std::fmt;
use std::str::FromStr;

/// Artifact format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Markdown document wrapping a Mermaid erDiagram
    #[default]
    Markdown,
    /// JSON format for programmatic use
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" | "mermaid" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Unknown format: {}. Valid options: markdown, json",
                s
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl OutputFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }

    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "md" | "markdown" => Some(OutputFormat::Markdown),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Heading text of an artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMeta {
    pub title: String,
    pub description: String,
}

impl DocumentMeta {
    pub fn new(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    /// Headings for the orphan-excluded artifact
    pub fn connected(&self, excluded: usize) -> Self {
        Self {
            title: format!("{} (Connected Entities Only)", self.title),
            description: format!(
                "{} Excludes {} orphaned {} with no relationships.",
                self.description,
                excluded,
                if excluded == 1 { "entity" } else { "entities" }
            ),
        }
    }
}

/// Render a complete artifact
pub fn render_document(view: &ErdView, meta: &DocumentMeta, format: OutputFormat) -> String {
    match format {
        OutputFormat::Markdown => to_markdown(view, meta),
        OutputFormat::Json => to_json(view, meta),
    }
}

/// Title, description and a fenced Mermaid block
pub fn to_markdown(view: &ErdView, meta: &DocumentMeta) -> String {
    let mut output = String::new();
    output.push_str(&format!("# {}\n\n", meta.title));
    output.push_str(&format!("{}\n\n", meta.description));
    output.push_str("```mermaid\n");
    output.push_str(&to_mermaid(view));
    output.push_str("```\n");
    output
}
