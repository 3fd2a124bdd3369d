//! HTTP configuration service client.
//!
//! # Responsibilities
//! - Fetch `{endpoint}/{app}/{server}/{filename}` with a request timeout
//! - Map 404 to `NotFound` and other non-2xx statuses to `Status`
//! - Keep a local copy of every fetched document in the conf directory

use async_trait::async_trait;
use reqwest::StatusCode;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::source::{check_filename, RemoteSource, ServerIdentity, SourceError};

pub struct HttpSource {
    client: reqwest::Client,
    endpoint: Url,
    identity: ServerIdentity,
    mirror_dir: Option<PathBuf>,
    name: String,
}

impl HttpSource {
    /// Create a client for the configuration service at `endpoint`.
    ///
    /// `mirror_dir`, when set, receives a copy of each fetched document.
    pub fn new(
        endpoint: &str,
        identity: ServerIdentity,
        timeout: Duration,
        mirror_dir: Option<PathBuf>,
    ) -> Result<Self, SourceError> {
        let invalid = |reason: &str| SourceError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        };

        let parsed = Url::parse(endpoint).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if parsed.cannot_be_a_base() {
            return Err(invalid("endpoint cannot be a base URL"));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            name: format!("http:{}", parsed),
            endpoint: parsed,
            identity,
            mirror_dir,
        })
    }

    /// URL a given filename is fetched from.
    pub fn url_for(&self, filename: &str) -> Result<Url, SourceError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| SourceError::InvalidEndpoint {
                endpoint: self.endpoint.to_string(),
                reason: "endpoint cannot be a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend([
                self.identity.app.as_str(),
                self.identity.server.as_str(),
                filename,
            ]);
        Ok(url)
    }

    async fn mirror(&self, filename: &str, content: &[u8]) {
        let Some(dir) = &self.mirror_dir else {
            return;
        };
        let path = dir.join(filename);
        if let Err(e) = write_copy(dir, &path, content).await {
            tracing::warn!(path = ?path, error = %e, "Failed to write local config copy");
        }
    }
}

async fn write_copy(dir: &Path, path: &Path, content: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(path, content).await
}

#[async_trait]
impl RemoteSource for HttpSource {
    async fn fetch(&self, filename: &str) -> Result<Vec<u8>, SourceError> {
        check_filename(filename)?;
        let url = self.url_for(filename)?;

        tracing::debug!(url = %url, "Fetching remote config");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(filename.to_string()));
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                filename: filename.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?.to_vec();
        if !body.is_empty() {
            self.mirror(filename, &body).await;
        }
        Ok(body)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
