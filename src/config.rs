//! YAML configuration for the generate command.
//!
//! Every key is optional. Command-line flags take precedence over values
//! loaded from the file, which take precedence over the built-in defaults.

use crate::error::{ErdError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// RESO Data Dictionary spreadsheet, exported as CSV
pub const DEFAULT_DICTIONARY_URL: &str = "https://docs.google.com/spreadsheets/d/1eOB4Nv3wrAayB1av7n2AWPBRWDeB-UkiDa8h8cdsIEI/export?format=csv&gid=1912290910";

/// RESO Data Dictionary XML schema
pub const DEFAULT_SCHEMA_URL: &str = "https://raw.githubusercontent.com/RESOStandards/web-api-commander/refs/heads/main/src/main/resources/RESODataDictionary-2.0.xml";

/// Where the two datasets come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourcesConfig {
    /// Data dictionary table (URL or local path)
    pub dictionary: String,
    /// XML schema document (URL or local path)
    pub schema: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            dictionary: DEFAULT_DICTIONARY_URL.to_string(),
            schema: DEFAULT_SCHEMA_URL.to_string(),
        }
    }
}

/// Column names in the data dictionary table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnsConfig {
    pub resource: String,
    pub field: String,
    pub target: String,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            resource: "ResourceName".to_string(),
            field: "StandardName".to_string(),
            target: "TargetResourceKey".to_string(),
        }
    }
}

/// Artifact locations and headings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Full diagram
    pub path: PathBuf,
    /// Diagram restricted to connected entities
    pub connected_path: PathBuf,
    pub title: String,
    pub description: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("reso_erd.md"),
            connected_path: PathBuf::from("reso_erd_connected.md"),
            title: "RESO Simple ERD".to_string(),
            description: "Mermaid ERD with only primary keys and foreign keys.".to_string(),
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            user_agent: concat!("reso-erd/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Complete YAML configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ErdConfig {
    pub sources: SourcesConfig,
    pub columns: ColumnsConfig,
    pub output: OutputConfig,
    pub http: HttpConfig,
}

impl ErdConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ErdError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|e| match e {
            ErdError::Config { message, .. } => ErdError::Config {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(content).map_err(|e| ErdError::Config {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }
}
