//! Remote configuration observer.
//!
//! Keeps locally consumed configuration documents in sync with a remote
//! configuration source by polling, fingerprinting and re-parsing only what
//! changed.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod observer;
pub mod source;
pub mod store;

pub use observer::{ConfigObserver, ObserverError, Registration, ReloadEvent, ReloadOutcome};
pub use source::{RemoteSource, ServerIdentity, SourceSettings};
pub use store::{ConfigFormat, ConfigStore};
