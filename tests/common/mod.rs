//! Shared helpers for observer integration tests.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use config_observer::source::StaticSource;
use config_observer::{ConfigObserver, ConfigStore, ReloadEvent, ServerIdentity};

pub fn identity() -> ServerIdentity {
    ServerIdentity::new("Demo", "Api", "/srv/demo/bin")
}

/// Observer over `source` with its own default store, so tests never touch
/// the process-wide one.
#[allow(dead_code)]
pub fn observer(source: &StaticSource, interval_secs: i64) -> ConfigObserver {
    ConfigObserver::builder(identity())
        .reload_interval(interval_secs)
        .with_source(Arc::new(source.clone()))
        .default_store(Arc::new(ConfigStore::new()))
        .build()
        .unwrap()
}

/// Next published event, failing the test after a minute (of virtual time
/// when the clock is paused).
#[allow(dead_code)]
pub async fn next_event(rx: &mut broadcast::Receiver<ReloadEvent>) -> ReloadEvent {
    tokio::time::timeout(Duration::from_secs(60), rx.recv())
        .await
        .expect("Timed out waiting for a reload event")
        .expect("Event channel closed")
}
