//! Reconciliation outcomes and the events published for them.

use crate::observer::fingerprint::Fingerprint;

/// Result of a successful reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Remote content matches the last ingested fingerprint.
    Unchanged,
    /// New content was fetched and ingested.
    Reloaded { fingerprint: Fingerprint },
}

impl ReloadOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Reloaded { .. })
    }
}

/// Published on the observer's broadcast channel.
///
/// `Unchanged` passes are not published.
#[derive(Debug, Clone, PartialEq)]
pub enum ReloadEvent {
    Reloaded {
        filename: String,
        fingerprint: Fingerprint,
    },
    Failed {
        filename: String,
        error: String,
    },
}

impl ReloadEvent {
    pub fn filename(&self) -> &str {
        match self {
            Self::Reloaded { filename, .. } | Self::Failed { filename, .. } => filename,
        }
    }
}
