//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load settings → Validate → Logging/metrics → Observer → Register files
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop reconciler after current pass → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: settings first, then observability, then observer
//! - Failed initial loads abort startup only when `fail_fast` is set

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
