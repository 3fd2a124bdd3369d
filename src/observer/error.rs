//! Observer error definitions.

use thiserror::Error;

use crate::observer::fingerprint::Fingerprint;
use crate::source::SourceError;
use crate::store::StoreError;

/// Errors raised while registering or reconciling remote configs.
#[derive(Debug, Error)]
pub enum ObserverError {
    /// The remote source was unreachable or rejected the request.
    #[error("failed to fetch {filename}: {source}")]
    SourceFetch {
        filename: String,
        #[source]
        source: SourceError,
    },

    /// The remote document has zero length.
    #[error("remote config {0} is empty")]
    EmptyContent(String),

    /// The store rejected the document. The fingerprint has already moved to
    /// `fingerprint`, so the same bytes are not parsed again.
    #[error("failed to ingest {filename} ({fingerprint}): {source}")]
    Ingest {
        filename: String,
        fingerprint: Fingerprint,
        #[source]
        source: StoreError,
    },

    /// No extension to derive a format from.
    #[error("invalid config filename {0:?}: expected <name>.<extension>")]
    InvalidFilename(String),

    #[error("unsupported config format {extension:?} for {filename}")]
    UnsupportedFormat { filename: String, extension: String },

    #[error("config {0} is already registered")]
    AlreadyRegistered(String),

    #[error("cannot bind {requested} to the default store: already bound to {bound}")]
    DefaultAlreadyBound { requested: String, bound: String },

    #[error("config {0} is not registered")]
    NotRegistered(String),

    /// The source client could not be created.
    #[error("source setup failed: {0}")]
    Source(#[from] SourceError),
}

impl ObserverError {
    /// Short, stable label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SourceFetch { .. } => "source_fetch",
            Self::EmptyContent(_) => "empty_content",
            Self::Ingest { .. } => "ingest",
            Self::InvalidFilename(_) => "invalid_filename",
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::AlreadyRegistered(_) => "already_registered",
            Self::DefaultAlreadyBound { .. } => "default_already_bound",
            Self::NotRegistered(_) => "not_registered",
            Self::Source(_) => "source",
        }
    }
}
