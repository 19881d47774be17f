//! Blocking HTTP loader.

use super::{Source, SourceLoader};
use crate::config::HttpConfig;
use crate::error::{ErdError, Result};
use crate::progress::{download_bar, ProgressReader};
use reqwest::blocking::Client;
use std::io::Read;
use std::time::Duration;

/// Fetches remote sources with a single blocking request each; no retries.
pub struct HttpLoader {
    client: Client,
    progress: bool,
}

impl HttpLoader {
    pub fn new(config: &HttpConfig, progress: bool) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|source| ErdError::Fetch {
                url: "<client>".to_string(),
                source,
            })?;
        Ok(Self { client, progress })
    }

    fn get(&self, url: &str, label: &str) -> Result<String> {
        tracing::info!(%url, "fetching");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| ErdError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ErdError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = if self.progress {
            let bar = download_bar(label, response.content_length());
            let mut reader = ProgressReader::new(response, bar);
            let mut bytes = Vec::new();
            reader
                .read_to_end(&mut bytes)
                .map_err(|source| ErdError::Body {
                    url: url.to_string(),
                    source,
                })?;
            reader.finish();
            bytes
        } else {
            response
                .bytes()
                .map_err(|source| ErdError::Fetch {
                    url: url.to_string(),
                    source,
                })?
                .to_vec()
        };

        tracing::info!(%url, bytes = bytes.len(), "fetched");
        Ok(decode_body(&bytes))
    }
}

/// Both download paths decode the same way; invalid UTF-8 is replaced, not rejected
fn decode_body(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

impl SourceLoader for HttpLoader {
    fn fetch_text(&self, source: &Source) -> Result<String> {
        match source {
            Source::Url(url) => self.get(url, short_name(url)),
            Source::Path(path) => Err(ErdError::Io {
                path: path.display().to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::Unsupported,
                    "local paths are not fetched over HTTP",
                ),
            }),
        }
    }

    fn fetch_named(&self, name: &str, source: &Source) -> Result<String> {
        match source {
            Source::Url(url) => self.get(url, name),
            Source::Path(_) => self.fetch_text(source),
        }
    }
}

/// Last path segment of a URL, without the query string
fn short_name(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(url)
}
