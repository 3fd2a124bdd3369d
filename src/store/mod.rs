//! Structured configuration store.
//!
//! # Data Flow
//! ```text
//! raw bytes (YAML/JSON/TOML)
//!     → format.rs (pick parser from declared format)
//!     → serde_json::Value document
//!     → config_store.rs (atomic swap, revision bump)
//!     → path.rs (dotted-key lookups for consumers)
//! ```
//!
//! # Design Decisions
//! - Documents are immutable once ingested; re-ingesting swaps the whole tree
//! - Readers never block writers (ArcSwap)
//! - A failed ingest keeps the previous document

pub mod config_store;
pub mod format;
pub mod path;

use std::sync::{Arc, LazyLock};

pub use config_store::{ConfigStore, StoreError};
pub use format::ConfigFormat;

static GLOBAL: LazyLock<Arc<ConfigStore>> = LazyLock::new(|| Arc::new(ConfigStore::new()));

/// The process-wide default store.
///
/// Code that only needs "the" configuration of the process can read it from
/// here without knowing which file populated it.
pub fn global() -> Arc<ConfigStore> {
    GLOBAL.clone()
}
