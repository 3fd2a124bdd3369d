//! Background reconciliation loop.
//!
//! # Responsibilities
//! - Sleep for the current reload interval
//! - Run one serial pass over every registered file
//! - Exit on the shutdown signal
//!
//! # Design Decisions
//! - The interval is re-read every cycle, so runtime changes apply from the
//!   next sleep
//! - Sleep starts after a pass finishes; passes never overlap
//! - A pass in progress is not interrupted; the signal is seen when it ends

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time;

use crate::observer::state::ObserverState;

pub(crate) struct Reconciler {
    state: Arc<ObserverState>,
}

impl Reconciler {
    pub fn new(state: Arc<ObserverState>) -> Self {
        Self { state }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.state.interval.get(),
            source = self.state.source.name(),
            "Config reconciler starting"
        );

        loop {
            let interval = Duration::from_secs(self.state.interval.get());
            tokio::select! {
                _ = time::sleep(interval) => {
                    self.state.reconcile_pass().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Config reconciler received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
