//! Settings schema definitions.

use serde::{Deserialize, Serialize};

use crate::observer::DEFAULT_RELOAD_INTERVAL_SECS;
use crate::source::{ServerIdentity, SourceSettings};

/// Root settings for the observer daemon.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Application/server identity used to scope remote lookups.
    pub identity: ServerIdentity,

    /// Which files to observe and how often.
    pub observer: ObserverConfig,

    /// Where documents are fetched from.
    pub source: SourceSettings,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObserverConfig {
    /// Seconds between reconciliation passes, clamped to [1, 3600].
    pub reload_interval_secs: i64,

    /// Directory for local copies. Empty: `<base_path>/../conf`.
    pub conf_path: String,

    /// Files to register at startup, in order.
    pub files: Vec<String>,

    /// File bound to the process-wide default store.
    pub default_file: Option<String>,

    /// Abort startup when a file fails its initial load.
    pub fail_fast: bool,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            reload_interval_secs: DEFAULT_RELOAD_INTERVAL_SECS as i64,
            conf_path: String::new(),
            files: Vec::new(),
            default_file: None,
            fail_fast: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
