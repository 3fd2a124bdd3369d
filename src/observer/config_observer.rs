//! The remote config observer.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::observer::entry::{split_filename, ConfigEntry};
use crate::observer::error::ObserverError;
use crate::observer::events::{ReloadEvent, ReloadOutcome};
use crate::observer::fingerprint::Fingerprint;
use crate::observer::interval::{ReloadInterval, DEFAULT_RELOAD_INTERVAL_SECS};
use crate::observer::reconciler::Reconciler;
use crate::observer::state::ObserverState;
use crate::source::{RemoteSource, ServerIdentity, SourceSettings};
use crate::store::{self, ConfigStore};

const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Outcome of registering a file.
///
/// The store handle is returned even when the initial load failed; it then
/// stays empty until a later pass succeeds.
#[derive(Debug)]
pub struct Registration {
    pub filename: String,
    pub store: Arc<ConfigStore>,
    pub is_default: bool,
    pub initial_load: Result<ReloadOutcome, ObserverError>,
}

impl Registration {
    /// Treat a failed initial load as an error.
    pub fn into_result(self) -> Result<Arc<ConfigStore>, ObserverError> {
        self.initial_load.map(|_| self.store)
    }
}

enum SourceChoice {
    Settings(SourceSettings),
    Client(Arc<dyn RemoteSource>),
}

/// Builder for [`ConfigObserver`].
pub struct ObserverBuilder {
    identity: ServerIdentity,
    reload_interval: i64,
    conf_path: String,
    source: SourceChoice,
    default_store: Option<Arc<ConfigStore>>,
    implicit_default: bool,
    event_capacity: usize,
}

impl ObserverBuilder {
    /// Seconds between passes. Out-of-range values become 60.
    pub fn reload_interval(mut self, secs: i64) -> Self {
        self.reload_interval = secs;
        self
    }

    /// Directory for local copies. Empty means `<base_path>/../conf`.
    pub fn conf_path(mut self, path: impl Into<String>) -> Self {
        self.conf_path = path.into();
        self
    }

    pub fn source(mut self, settings: SourceSettings) -> Self {
        self.source = SourceChoice::Settings(settings);
        self
    }

    /// Use an already constructed source client.
    pub fn with_source(mut self, source: Arc<dyn RemoteSource>) -> Self {
        self.source = SourceChoice::Client(source);
        self
    }

    /// Store handed to the default registration instead of
    /// [`store::global`].
    pub fn default_store(mut self, store: Arc<ConfigStore>) -> Self {
        self.default_store = Some(store);
        self
    }

    /// When set (the default), the first `register` call binds its file to
    /// the default store if nothing is bound yet.
    pub fn implicit_default(mut self, enabled: bool) -> Self {
        self.implicit_default = enabled;
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    /// Build the observer and start its background task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn build(self) -> Result<ConfigObserver, ObserverError> {
        let conf_path = self.identity.resolve_conf_path(&self.conf_path);
        let source = match &self.source {
            SourceChoice::Settings(settings) => settings.build(&self.identity, &conf_path)?,
            SourceChoice::Client(client) => client.clone(),
        };
        Ok(self.start(conf_path, source))
    }

    fn start(self, conf_path: PathBuf, source: Arc<dyn RemoteSource>) -> ConfigObserver {
        let (events, _) = broadcast::channel(self.event_capacity);
        let state = Arc::new(ObserverState {
            source,
            entries: DashMap::new(),
            interval: ReloadInterval::new(self.reload_interval),
            events,
        });

        let shutdown = Shutdown::new();
        let task = tokio::spawn(Reconciler::new(state.clone()).run(shutdown.subscribe()));

        tracing::info!(
            app = %self.identity.app,
            server = %self.identity.server,
            conf_path = ?conf_path,
            interval_secs = state.interval.get(),
            "Config observer started"
        );

        ConfigObserver {
            state,
            identity: self.identity,
            conf_path,
            default_store: self.default_store.unwrap_or_else(store::global),
            default_filename: Mutex::new(None),
            implicit_default: self.implicit_default,
            shutdown,
            task: tokio::sync::Mutex::new(Some(task)),
        }
    }
}

/// Keeps registered config files in sync with a remote source.
///
/// One observer per process. Each registered file gets a [`ConfigStore`]
/// that is re-ingested whenever the remote content's fingerprint changes.
pub struct ConfigObserver {
    state: Arc<ObserverState>,
    identity: ServerIdentity,
    conf_path: PathBuf,
    default_store: Arc<ConfigStore>,
    default_filename: Mutex<Option<String>>,
    implicit_default: bool,
    shutdown: Shutdown,
    task: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl ConfigObserver {
    pub fn builder(identity: ServerIdentity) -> ObserverBuilder {
        ObserverBuilder {
            identity,
            reload_interval: DEFAULT_RELOAD_INTERVAL_SECS as i64,
            conf_path: String::new(),
            source: SourceChoice::Settings(SourceSettings::default()),
            default_store: None,
            implicit_default: true,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    /// Create an observer around `source` and start its background task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(
        reload_interval_secs: i64,
        conf_path: &str,
        identity: ServerIdentity,
        source: Arc<dyn RemoteSource>,
    ) -> Self {
        let conf_path = identity.resolve_conf_path(conf_path);
        Self::builder(identity)
            .reload_interval(reload_interval_secs)
            .start(conf_path, source)
    }

    /// Track `filename` with its own store and load it once.
    ///
    /// With implicit default binding enabled, the first registered file gets
    /// the default store instead.
    pub async fn register(&self, filename: &str) -> Result<Registration, ObserverError> {
        self.register_inner(filename, self.implicit_default, false).await
    }

    /// Track `filename` using the default store and load it once.
    pub async fn register_default(&self, filename: &str) -> Result<Registration, ObserverError> {
        self.register_inner(filename, false, true).await
    }

    async fn register_inner(
        &self,
        filename: &str,
        bind_if_unbound: bool,
        require_default: bool,
    ) -> Result<Registration, ObserverError> {
        let (config_name, format) = split_filename(filename)?;

        let entry = {
            let mut default_slot = self
                .default_filename
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            if require_default {
                if let Some(bound) = default_slot.as_ref() {
                    return Err(ObserverError::DefaultAlreadyBound {
                        requested: filename.to_string(),
                        bound: bound.clone(),
                    });
                }
            }
            let is_default = require_default || (bind_if_unbound && default_slot.is_none());

            match self.state.entries.entry(filename.to_string()) {
                Entry::Occupied(_) => {
                    return Err(ObserverError::AlreadyRegistered(filename.to_string()));
                }
                Entry::Vacant(vacant) => {
                    let store = if is_default {
                        self.default_store.clone()
                    } else {
                        Arc::new(ConfigStore::new())
                    };
                    let entry = Arc::new(ConfigEntry::new(
                        filename,
                        config_name,
                        format,
                        store,
                        is_default,
                    ));
                    vacant.insert(entry.clone());
                    if is_default {
                        *default_slot = Some(filename.to_string());
                    }
                    entry
                }
            }
        };

        metrics::set_tracked_files(self.state.entries.len());
        tracing::info!(
            file = %filename,
            format = %entry.format(),
            default = entry.is_default(),
            "Registered remote config"
        );

        let initial_load = self.state.reconcile_entry(&entry).await;

        Ok(Registration {
            filename: filename.to_string(),
            store: entry.store().clone(),
            is_default: entry.is_default(),
            initial_load,
        })
    }

    /// Reconcile one registered file now.
    pub async fn reconcile(&self, filename: &str) -> Result<ReloadOutcome, ObserverError> {
        let entry = self
            .state
            .entry(filename)
            .ok_or_else(|| ObserverError::NotRegistered(filename.to_string()))?;
        self.state.reconcile_entry(&entry).await
    }

    /// Run one full pass now, outside the background schedule.
    pub async fn reconcile_all(&self) -> Vec<(String, Result<ReloadOutcome, ObserverError>)> {
        self.state.reconcile_pass().await
    }

    pub fn store(&self, filename: &str) -> Option<Arc<ConfigStore>> {
        self.state.entry(filename).map(|e| e.store().clone())
    }

    /// `Ok(None)` for a registered file that has never been ingested.
    pub fn fingerprint(&self, filename: &str) -> Result<Option<Fingerprint>, ObserverError> {
        self.state
            .entry(filename)
            .map(|e| e.fingerprint())
            .ok_or_else(|| ObserverError::NotRegistered(filename.to_string()))
    }

    pub fn default_store(&self) -> Arc<ConfigStore> {
        self.default_store.clone()
    }

    pub fn default_filename(&self) -> Option<String> {
        self.default_filename
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn filenames(&self) -> Vec<String> {
        self.state
            .snapshot()
            .iter()
            .map(|e| e.filename().to_string())
            .collect()
    }

    pub fn reload_interval(&self) -> u64 {
        self.state.interval.get()
    }

    /// Change the interval; applies from the next sleep. Returns the
    /// effective (clamped) value.
    pub fn set_reload_interval(&self, secs: i64) -> u64 {
        let effective = self.state.interval.set(secs);
        tracing::info!(interval_secs = effective, "Reload interval updated");
        effective
    }

    /// Reload and failure events from every reconciliation.
    pub fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
        self.state.events.subscribe()
    }

    pub fn conf_path(&self) -> &Path {
        &self.conf_path
    }

    pub fn identity(&self) -> &ServerIdentity {
        &self.identity
    }

    pub fn source_name(&self) -> &str {
        self.state.source.name()
    }

    /// Stop the background task and wait for it to finish.
    ///
    /// A pass in progress completes first. Calling this twice is a no-op.
    pub async fn shutdown(&self) {
        self.shutdown.trigger();
        let task = self.task.lock().await.take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Config reconciler task failed");
            }
        }
    }
}

impl Drop for ConfigObserver {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}
