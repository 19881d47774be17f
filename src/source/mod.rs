//! Source loading: remote URLs and local files.
//!
//! The pipeline only needs raw text for both datasets. Anything that can
//! produce it implements [`SourceLoader`], which keeps tests off the network.

mod http;

pub use http::HttpLoader;

use crate::error::{ErdError, Result};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

/// Location of a dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Fetched over HTTP(S)
    Url(String),
    /// Read from the local filesystem
    Path(PathBuf),
}

impl Source {
    pub fn is_remote(&self) -> bool {
        matches!(self, Source::Url(_))
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("source must not be empty".to_string());
        }
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(Source::Url(s.to_string()))
        } else {
            Ok(Source::Path(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{}", url),
            Source::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Produces the raw text of a dataset
pub trait SourceLoader {
    fn fetch_text(&self, source: &Source) -> Result<String>;

    /// Fetch a dataset known to the operator by `name`, e.g. "dictionary"
    fn fetch_named(&self, _name: &str, source: &Source) -> Result<String> {
        self.fetch_text(source)
    }
}

/// Reads local files; refuses URLs
#[derive(Debug, Default, Clone, Copy)]
pub struct FileLoader;

impl SourceLoader for FileLoader {
    fn fetch_text(&self, source: &Source) -> Result<String> {
        match source {
            Source::Path(path) => read_file(path),
            Source::Url(url) => Err(ErdError::Io {
                path: url.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::Unsupported,
                    "remote sources need an HTTP loader",
                ),
            }),
        }
    }
}

/// Dispatches URLs to HTTP and paths to the filesystem
pub struct DefaultLoader {
    http: HttpLoader,
}

impl DefaultLoader {
    pub fn new(http: HttpLoader) -> Self {
        Self { http }
    }
}

impl SourceLoader for DefaultLoader {
    fn fetch_text(&self, source: &Source) -> Result<String> {
        match source {
            Source::Url(_) => self.http.fetch_text(source),
            Source::Path(path) => read_file(path),
        }
    }

    fn fetch_named(&self, name: &str, source: &Source) -> Result<String> {
        match source {
            Source::Url(_) => self.http.fetch_named(name, source),
            Source::Path(path) => read_file(path),
        }
    }
}

fn read_file(path: &std::path::Path) -> Result<String> {
    tracing::info!(path = %path.display(), "reading local source");
    fs::read_to_string(path).map_err(|source| ErdError::Io {
        path: path.display().to_string(),
        source,
    })
}
