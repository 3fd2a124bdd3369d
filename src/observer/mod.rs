//! Remote config observer subsystem.
//!
//! # Data Flow
//! ```text
//! register("app.yaml"):
//!     split name/format → pick store (default or fresh)
//!     → insert entry → eager reconcile → Registration
//!
//! Background task (reconciler.rs), every reload interval:
//!     for each entry:
//!         fetch → empty? error
//!         → CRC-32 == last fingerprint? unchanged
//!         → store fingerprint → ingest into store
//!     → log, metrics, ReloadEvent broadcast
//! ```
//!
//! # Design Decisions
//! - Entries live in a DashMap and are never removed
//! - Each entry serializes its own reconciliations with an async mutex
//! - Background failures never stop the loop; they are logged, counted and
//!   published as events
//! - Default-store binding is explicit (`register_default`) or, when enabled,
//!   happens once for the first `register` call

pub mod config_observer;
pub mod entry;
pub mod error;
pub mod events;
pub mod fingerprint;
pub mod interval;
mod reconciler;
mod state;

pub use config_observer::{ConfigObserver, ObserverBuilder, Registration};
pub use entry::ConfigEntry;
pub use error::ObserverError;
pub use events::{ReloadEvent, ReloadOutcome};
pub use fingerprint::Fingerprint;
pub use interval::{clamp_reload_interval, DEFAULT_RELOAD_INTERVAL_SECS};
