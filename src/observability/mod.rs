//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Observer and sources produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (reload counters, pass duration, tracked files)
//!
//! Consumers:
//!     → stdout log stream
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields (`file`, `fingerprint`, `error`) on every event
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
