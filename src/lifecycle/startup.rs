//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize logging and the metrics exporter
//! - Build the observer from validated settings
//! - Register configured files in order, binding the default file
//!
//! # Design Decisions
//! - Invalid filenames are always fatal (settings validation normally
//!   catches them first)
//! - A failed initial load is fatal only with `fail_fast`; otherwise the
//!   file stays registered and the background task keeps retrying

use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{ObservabilityConfig, Settings};
use crate::observability::{logging, metrics};
use crate::observer::{ConfigObserver, ObserverError};
use crate::store::{self, ConfigStore};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to initialize logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error(transparent)]
    Observer(#[from] ObserverError),

    #[error("initial load of {filename} failed: {source}")]
    InitialLoad {
        filename: String,
        #[source]
        source: ObserverError,
    },
}

/// Install the log subscriber and, when enabled, the Prometheus exporter.
pub fn init_observability(config: &ObservabilityConfig) -> Result<(), StartupError> {
    logging::init(&config.log_level)?;

    if config.metrics_enabled {
        let addr: SocketAddr = config
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }
    Ok(())
}

/// Build the observer and register every configured file.
///
/// The default file is bound to the process-wide [`store::global`] store.
pub async fn start_observer(settings: &Settings) -> Result<ConfigObserver, StartupError> {
    start_observer_with_store(settings, store::global()).await
}

/// Like [`start_observer`], with an explicit default store.
pub async fn start_observer_with_store(
    settings: &Settings,
    default_store: Arc<ConfigStore>,
) -> Result<ConfigObserver, StartupError> {
    let observer_cfg = &settings.observer;
    let observer = ConfigObserver::builder(settings.identity.clone())
        .reload_interval(observer_cfg.reload_interval_secs)
        .conf_path(observer_cfg.conf_path.clone())
        .source(settings.source.clone())
        .default_store(default_store)
        .implicit_default(observer_cfg.default_file.is_none())
        .build()?;

    tracing::info!(
        source = observer.source_name(),
        files = observer_cfg.files.len(),
        "Registering remote configs"
    );

    for filename in &observer_cfg.files {
        let is_default = observer_cfg.default_file.as_deref() == Some(filename.as_str());
        let registration = if is_default {
            observer.register_default(filename).await
        } else {
            observer.register(filename).await
        };

        let registration = match registration {
            Ok(registration) => registration,
            Err(e) => {
                observer.shutdown().await;
                return Err(e.into());
            }
        };

        if let Err(source) = registration.initial_load {
            if observer_cfg.fail_fast {
                observer.shutdown().await;
                return Err(StartupError::InitialLoad {
                    filename: filename.clone(),
                    source,
                });
            }
            tracing::warn!(
                file = %filename,
                error = %source,
                "Initial load failed, continuing with an empty store"
            );
        }
    }

    Ok(observer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceSettings;

    fn settings(root: &std::path::Path, files: &[&str]) -> Settings {
        let mut settings = Settings::default();
        settings.observer.files = files.iter().map(|f| f.to_string()).collect();
        settings.source = SourceSettings::Directory {
            root: Some(root.to_path_buf()),
        };
        settings
    }

    #[tokio::test]
    async fn test_start_registers_files_in_configured_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.yaml"), "k: 1").unwrap();
        std::fs::write(dir.path().join("db.toml"), "port = 5432").unwrap();

        // No default_file: the first configured file takes the default store,
        // even though it sorts last.
        let settings = settings(dir.path(), &["db.toml", "app.yaml"]);
        let default_store = Arc::new(ConfigStore::new());

        let observer = start_observer_with_store(&settings, default_store.clone())
            .await
            .unwrap();
        assert_eq!(observer.default_filename().as_deref(), Some("db.toml"));
        assert_eq!(default_store.get_i64("port"), Some(5432));
        assert!(!Arc::ptr_eq(&observer.store("app.yaml").unwrap(), &default_store));
        observer.shutdown().await;
    }

    #[tokio::test]
    async fn test_start_binds_explicit_default_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.yaml"), "k: 1").unwrap();
        std::fs::write(dir.path().join("db.toml"), "port = 5432").unwrap();

        let mut settings = settings(dir.path(), &["app.yaml", "db.toml"]);
        settings.observer.default_file = Some("db.toml".into());

        let observer = start_observer_with_store(&settings, Arc::new(ConfigStore::new()))
            .await
            .unwrap();
        assert_eq!(observer.filenames(), vec!["app.yaml", "db.toml"]);
        assert_eq!(observer.default_filename().as_deref(), Some("db.toml"));
        assert!(!observer.store("app.yaml").unwrap().is_set("port"));
        assert_eq!(observer.store("db.toml").unwrap().get_i64("port"), Some(5432));
        observer.shutdown().await;
    }

    #[tokio::test]
    async fn test_fail_fast_aborts_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path(), &["missing.yaml"]);

        let err = start_observer_with_store(&settings, Arc::new(ConfigStore::new()))
            .await
            .err()
            .unwrap();
        assert!(matches!(
            err,
            StartupError::InitialLoad { ref filename, .. } if filename == "missing.yaml"
        ));
    }

    #[tokio::test]
    async fn test_degraded_start_keeps_file_registered() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings(dir.path(), &["missing.yaml"]);
        settings.observer.fail_fast = false;

        let observer = start_observer_with_store(&settings, Arc::new(ConfigStore::new()))
            .await
            .unwrap();
        assert_eq!(observer.fingerprint("missing.yaml").unwrap(), None);

        std::fs::write(dir.path().join("missing.yaml"), "k: 1").unwrap();
        assert!(observer.reconcile("missing.yaml").await.unwrap().is_changed());
        observer.shutdown().await;
    }
}
