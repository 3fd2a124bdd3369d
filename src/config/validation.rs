//! Settings validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Observed filenames resolve to a supported format and are unique
//! - The default file is one of the observed files
//! - Endpoints, addresses and levels parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: Settings → Result<(), Vec<ValidationError>>
//! - The reload interval is clamped, not rejected

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::Settings;
use crate::observability::logging::LOG_LEVELS;
use crate::observer::entry::split_filename;
use crate::source::SourceSettings;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("identity.{0} must not be empty")]
    EmptyIdentity(&'static str),

    #[error("observer.files: {0}")]
    BadFile(String),

    #[error("observer.files: {0} listed more than once")]
    DuplicateFile(String),

    #[error("observer.default_file {0} is not listed in observer.files")]
    UnknownDefault(String),

    #[error("source.endpoint {0:?} is not an http(s) URL")]
    BadEndpoint(String),

    #[error("source.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("observability.metrics_address {0:?} is not a socket address")]
    BadMetricsAddress(String),

    #[error("observability.log_level {0:?} is not one of trace, debug, info, warn, error")]
    BadLogLevel(String),
}

pub fn validate_config(settings: &Settings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.identity.app.trim().is_empty() {
        errors.push(ValidationError::EmptyIdentity("app"));
    }
    if settings.identity.server.trim().is_empty() {
        errors.push(ValidationError::EmptyIdentity("server"));
    }

    let mut seen = HashSet::new();
    for file in &settings.observer.files {
        if let Err(e) = split_filename(file) {
            errors.push(ValidationError::BadFile(e.to_string()));
        }
        if !seen.insert(file.as_str()) {
            errors.push(ValidationError::DuplicateFile(file.clone()));
        }
    }

    if let Some(default) = &settings.observer.default_file {
        if !seen.contains(default.as_str()) {
            errors.push(ValidationError::UnknownDefault(default.clone()));
        }
    }

    if let SourceSettings::Http {
        endpoint,
        timeout_secs,
        ..
    } = &settings.source
    {
        let valid = url::Url::parse(endpoint)
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::BadEndpoint(endpoint.clone()));
        }
        if *timeout_secs == 0 {
            errors.push(ValidationError::ZeroTimeout);
        }
    }

    let obs = &settings.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadMetricsAddress(obs.metrics_address.clone()));
    }
    if !LOG_LEVELS.contains(&obs.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::BadLogLevel(obs.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_files(files: &[&str]) -> Settings {
        let mut settings = Settings::default();
        settings.observer.files = files.iter().map(|f| f.to_string()).collect();
        settings
    }

    #[test]
    fn test_default_settings_are_valid() {
        assert!(validate_config(&Settings::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut settings = settings_with_files(&["app.yaml", "app.yaml", "notes", "x.ini"]);
        settings.identity.app = " ".into();
        settings.observer.default_file = Some("db.toml".into());
        settings.source = SourceSettings::Http {
            endpoint: "config.internal".into(),
            timeout_secs: 0,
            mirror: false,
        };
        settings.observability.metrics_enabled = true;
        settings.observability.metrics_address = "localhost".into();
        settings.observability.log_level = "loud".into();

        let errors = validate_config(&settings).unwrap_err();
        assert_eq!(errors.len(), 9);
        assert!(errors.contains(&ValidationError::EmptyIdentity("app")));
        assert!(errors.contains(&ValidationError::DuplicateFile("app.yaml".into())));
        assert!(errors.contains(&ValidationError::UnknownDefault("db.toml".into())));
        assert!(errors.contains(&ValidationError::ZeroTimeout));
        assert!(errors.contains(&ValidationError::BadLogLevel("loud".into())));
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut settings = Settings::default();
        settings.observability.metrics_address = "nonsense".into();
        assert!(validate_config(&settings).is_ok());
    }
}
