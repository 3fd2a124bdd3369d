//! Settings for the observer daemon.
//!
//! # Data Flow
//! ```text
//! settings file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → Settings (validated, immutable)
//!     → lifecycle::startup builds the observer from it
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal settings files
//! - Validation separates syntactic (serde) from semantic checks
//! - The observed remote documents are not settings; they live in stores

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{ObservabilityConfig, ObserverConfig, Settings};
