//! ERD (Entity-Relationship Diagram) derivation module.
//!
//! This module provides:
//! - Entity construction from data dictionary rows and schema keys
//! - Relationship resolution between foreign keys and primary keys
//! - Orphan filtering down to connected entities
//! - Output formats: Markdown-wrapped Mermaid and JSON

pub mod analysis;
pub mod builder;
pub mod format;
pub mod model;
pub mod report;
pub mod view;

pub use analysis::{connected_names, resolve_relationships, KeyIndex, Resolution};
pub use builder::build_entities;
pub use format::{render_document, to_json, to_markdown, to_mermaid, DocumentMeta, OutputFormat};
pub use model::{Diagnostic, Entity, EntityMap, Field, Relationship};
pub use report::ErdReport;
pub use view::{ErdView, Scope};
