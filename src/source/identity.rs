//! Application/server identity that scopes remote lookups.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Identity of the running service as known to the configuration service.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerIdentity {
    /// Application name.
    pub app: String,

    /// Server (service) name within the application.
    pub server: String,

    /// Installation base path of the service binary.
    pub base_path: PathBuf,
}

impl ServerIdentity {
    pub fn new(
        app: impl Into<String>,
        server: impl Into<String>,
        base_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            app: app.into(),
            server: server.into(),
            base_path: base_path.into(),
        }
    }

    /// Conventional directory for local copies of remote configs:
    /// `<base_path>/../conf`.
    pub fn default_conf_path(&self) -> PathBuf {
        self.base_path.join("..").join("conf")
    }

    /// `path` if non-empty, otherwise the conventional conf path.
    pub fn resolve_conf_path(&self, path: &str) -> PathBuf {
        if path.is_empty() {
            self.default_conf_path()
        } else {
            Path::new(path).to_path_buf()
        }
    }
}

impl Default for ServerIdentity {
    fn default() -> Self {
        Self {
            app: "app".to_string(),
            server: "server".to_string(),
            base_path: PathBuf::from("."),
        }
    }
}
