//! State shared between the observer handle and its background task.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;

use crate::observability::metrics;
use crate::observer::entry::ConfigEntry;
use crate::observer::error::ObserverError;
use crate::observer::events::{ReloadEvent, ReloadOutcome};
use crate::observer::interval::ReloadInterval;
use crate::source::RemoteSource;

pub(crate) struct ObserverState {
    pub source: Arc<dyn RemoteSource>,
    pub entries: DashMap<String, Arc<ConfigEntry>>,
    pub interval: ReloadInterval,
    pub events: broadcast::Sender<ReloadEvent>,
}

impl ObserverState {
    pub fn entry(&self, filename: &str) -> Option<Arc<ConfigEntry>> {
        self.entries.get(filename).map(|r| r.value().clone())
    }

    /// Entries sorted by filename. No map guard outlives this call.
    pub fn snapshot(&self) -> Vec<Arc<ConfigEntry>> {
        let mut entries: Vec<_> = self.entries.iter().map(|r| r.value().clone()).collect();
        entries.sort_by(|a, b| a.filename().cmp(b.filename()));
        entries
    }

    /// Reconcile one entry, then log, count and publish the result.
    pub async fn reconcile_entry(&self, entry: &ConfigEntry) -> Result<ReloadOutcome, ObserverError> {
        let result = entry.reconcile(self.source.as_ref()).await;
        let filename = entry.filename();

        match &result {
            Ok(ReloadOutcome::Unchanged) => {
                tracing::trace!(file = %filename, "Config unchanged");
                metrics::record_reload(filename, "unchanged");
            }
            Ok(ReloadOutcome::Reloaded { fingerprint }) => {
                tracing::info!(
                    file = %filename,
                    fingerprint = %fingerprint,
                    revision = entry.store().revision(),
                    "Config reloaded"
                );
                metrics::record_reload(filename, "reloaded");
                let _ = self.events.send(ReloadEvent::Reloaded {
                    filename: filename.to_string(),
                    fingerprint: *fingerprint,
                });
            }
            Err(e) => {
                tracing::warn!(file = %filename, error = %e, "Config reconciliation failed");
                metrics::record_reload_failure(filename, e.kind());
                let _ = self.events.send(ReloadEvent::Failed {
                    filename: filename.to_string(),
                    error: e.to_string(),
                });
            }
        }

        result
    }

    /// One serial pass over every registered entry.
    pub async fn reconcile_pass(&self) -> Vec<(String, Result<ReloadOutcome, ObserverError>)> {
        let started = Instant::now();
        let entries = self.snapshot();
        let mut results = Vec::with_capacity(entries.len());

        for entry in entries {
            let result = self.reconcile_entry(&entry).await;
            results.push((entry.filename().to_string(), result));
        }

        let elapsed = started.elapsed();
        metrics::record_pass_duration(elapsed.as_secs_f64());
        tracing::debug!(
            files = results.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Reconciliation pass complete"
        );
        results
    }
}
