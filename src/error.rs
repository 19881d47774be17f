//! Error types shared by the loaders and the ERD pipeline.
//!
//! Only conditions that abort a run are errors. Data quality problems found
//! while deriving the diagram are reported as [`crate::graph::Diagnostic`]s.

use thiserror::Error;

/// Fatal error raised while loading sources or writing artifacts
#[derive(Debug, Error)]
pub enum ErdError {
    /// The remote source could not be reached
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The remote source answered with a non-success status
    #[error("failed to fetch {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    /// The connection failed while the response body was streaming
    #[error("failed to read response from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// A local source or an output file could not be read or written
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The data dictionary table is malformed
    #[error("malformed data dictionary: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the data dictionary header
    #[error("data dictionary is missing required column '{0}'")]
    MissingColumn(String),

    /// The configuration file could not be parsed
    #[error("invalid config {path}: {message}")]
    Config { path: String, message: String },

    /// Diagnostics were found and strict mode rejects them
    #[error("strict mode: {count} schema problem(s) found, first: {first}")]
    Strict { count: usize, first: String },
}

impl ErdError {
    /// Whether this error came from the network collaborator
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            ErdError::Fetch { .. } | ErdError::Status { .. } | ErdError::Body { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ErdError>;
