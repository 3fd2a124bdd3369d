//! Stop signal for background tasks.

use tokio::sync::broadcast;

/// Broadcast stop signal.
///
/// Every long-running task subscribes once before it starts; dropping the
/// `Shutdown` also releases subscribers (their `recv` returns `Closed`).
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every subscriber. Safe to call repeatedly.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Subscribers that have not yet dropped their receiver.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
