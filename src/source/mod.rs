//! Remote configuration sources.
//!
//! # Data Flow
//! ```text
//! observer asks for "app.yaml"
//!     → RemoteSource::fetch (scoped to app/server identity)
//!     → http.rs:      GET {endpoint}/{app}/{server}/app.yaml, mirror to conf dir
//!     → directory.rs: read {root}/app.yaml
//!     → memory.rs:    in-process map (embedding, tests)
//!     → raw bytes back to the observer
//! ```
//!
//! # Design Decisions
//! - Sources return raw bytes; parsing belongs to the store
//! - Timeouts are owned by the source, not the observer
//! - No retries here; the observer's next pass is the retry

pub mod directory;
pub mod http;
pub mod identity;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

pub use directory::DirectorySource;
pub use http::HttpSource;
pub use identity::ServerIdentity;
pub use memory::StaticSource;

/// Errors returned by a [`RemoteSource`].
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote returned status {status} for {filename}")]
    Status { filename: String, status: u16 },

    #[error("config {0} not found")]
    NotFound(String),

    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Filenames must be plain names, not paths.
    #[error("invalid config filename {0:?}")]
    InvalidFilename(String),
}

/// Fetches raw configuration documents by filename.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetch the current content of `filename`.
    async fn fetch(&self, filename: &str) -> Result<Vec<u8>, SourceError>;

    /// Human-readable name for logs.
    fn name(&self) -> &str;
}

/// Source selection as it appears in the settings file.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceSettings {
    Http {
        /// Base URL of the configuration service.
        endpoint: String,

        /// Per-request timeout in seconds.
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,

        /// Write a local copy of every fetched document into the conf path.
        #[serde(default = "default_mirror")]
        mirror: bool,
    },
    Directory {
        /// Directory to read from. Defaults to the conf path.
        #[serde(default)]
        root: Option<PathBuf>,
    },
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_mirror() -> bool {
    true
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self::Directory { root: None }
    }
}

impl SourceSettings {
    /// Build the source client bound to `identity` and the resolved conf path.
    pub fn build(
        &self,
        identity: &ServerIdentity,
        conf_path: &Path,
    ) -> Result<Arc<dyn RemoteSource>, SourceError> {
        let source: Arc<dyn RemoteSource> = match self {
            Self::Http {
                endpoint,
                timeout_secs,
                mirror,
            } => {
                let mirror_dir = mirror.then(|| conf_path.to_path_buf());
                Arc::new(HttpSource::new(
                    endpoint,
                    identity.clone(),
                    std::time::Duration::from_secs(*timeout_secs),
                    mirror_dir,
                )?)
            }
            Self::Directory { root } => {
                let root = root.clone().unwrap_or_else(|| conf_path.to_path_buf());
                Arc::new(DirectorySource::new(root))
            }
        };
        Ok(source)
    }
}

/// Reject names that are empty or would leave the directory they are
/// resolved against.
pub(crate) fn check_filename(filename: &str) -> Result<(), SourceError> {
    let plain = !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\']);
    if plain {
        Ok(())
    } else {
        Err(SourceError::InvalidFilename(filename.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_filename() {
        assert!(check_filename("app.yaml").is_ok());
        assert!(check_filename("..app.yaml").is_ok());
        assert!(check_filename("").is_err());
        assert!(check_filename("..").is_err());
        assert!(check_filename("../etc/passwd").is_err());
        assert!(check_filename("dir\\app.yaml").is_err());
    }

    #[test]
    fn test_source_settings_from_toml() {
        let http: SourceSettings =
            toml::from_str("kind = \"http\"\nendpoint = \"http://cfg:8080\"").unwrap();
        assert_eq!(
            http,
            SourceSettings::Http {
                endpoint: "http://cfg:8080".into(),
                timeout_secs: 10,
                mirror: true,
            }
        );

        let dir: SourceSettings = toml::from_str("kind = \"directory\"").unwrap();
        assert_eq!(dir, SourceSettings::Directory { root: None });
    }

    #[test]
    fn test_directory_defaults_to_conf_path() {
        let identity = ServerIdentity::new("Demo", "Api", "/srv/demo/bin/");
        let source = SourceSettings::default()
            .build(&identity, Path::new("/srv/demo/conf"))
            .unwrap();
        assert_eq!(source.name(), "directory:/srv/demo/conf");
    }

    #[test]
    fn test_http_rejects_bad_endpoint() {
        let identity = ServerIdentity::new("Demo", "Api", "");
        let settings = SourceSettings::Http {
            endpoint: "not a url".into(),
            timeout_secs: 1,
            mirror: false,
        };
        assert!(matches!(
            settings.build(&identity, Path::new("conf")),
            Err(SourceError::InvalidEndpoint { .. })
        ));
    }
}
