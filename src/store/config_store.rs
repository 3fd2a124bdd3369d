//! Thread-safe parsed configuration document.

use arc_swap::{ArcSwap, ArcSwapOption};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

use crate::store::format::{ConfigFormat, ParseError};
use crate::store::path;

/// Errors raised by [`ConfigStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// `ingest` was called before `configure`.
    #[error("store has no configured format")]
    Unconfigured,

    /// The document could not be parsed in the configured format.
    #[error("failed to parse {name} as {format}: {source}")]
    Parse {
        name: String,
        format: ConfigFormat,
        #[source]
        source: ParseError,
    },

    #[error("key not found: {0}")]
    MissingKey(String),

    #[error("key {key} has unexpected type: {source}")]
    Type {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Logical name and format the store expects to ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDescriptor {
    pub name: String,
    pub format: ConfigFormat,
}

/// A structured configuration document that can be replaced at runtime.
///
/// Lookups read the current document without locking; `ingest` swaps in a
/// freshly parsed tree. Handles are shared as `Arc<ConfigStore>`.
#[derive(Debug)]
pub struct ConfigStore {
    descriptor: ArcSwapOption<StoreDescriptor>,
    document: ArcSwap<Value>,
    revision: AtomicU64,
}

impl ConfigStore {
    /// Create an empty, unconfigured store.
    pub fn new() -> Self {
        Self {
            descriptor: ArcSwapOption::empty(),
            document: ArcSwap::from_pointee(Value::Null),
            revision: AtomicU64::new(0),
        }
    }

    /// Set the logical document name and the format of future ingests.
    pub fn configure(&self, name: impl Into<String>, format: ConfigFormat) {
        self.descriptor.store(Some(Arc::new(StoreDescriptor {
            name: name.into(),
            format,
        })));
    }

    pub fn name(&self) -> Option<String> {
        self.descriptor.load_full().map(|d| d.name.clone())
    }

    pub fn format(&self) -> Option<ConfigFormat> {
        self.descriptor.load_full().map(|d| d.format)
    }

    /// Parse `raw` and replace the current document.
    ///
    /// On error the previous document stays in place and the revision is
    /// not bumped.
    pub fn ingest(&self, raw: &[u8]) -> Result<(), StoreError> {
        let descriptor = self.descriptor.load_full().ok_or(StoreError::Unconfigured)?;

        let value = descriptor
            .format
            .parse(raw)
            .map_err(|source| StoreError::Parse {
                name: descriptor.name.clone(),
                format: descriptor.format,
                source,
            })?;

        self.document.store(Arc::new(value));
        self.revision.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    /// Number of successful ingests so far.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    /// The whole current document. `Value::Null` until the first ingest.
    pub fn snapshot(&self) -> Arc<Value> {
        self.document.load_full()
    }

    /// Look up a dotted key, e.g. `database.pool.max_size`.
    pub fn lookup(&self, key: &str) -> Option<Value> {
        let doc = self.document.load();
        path::resolve(&doc, key).cloned()
    }

    pub fn is_set(&self, key: &str) -> bool {
        let doc = self.document.load();
        path::resolve(&doc, key).is_some_and(|v| !v.is_null())
    }

    /// Deserialize the value at `key` into `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, StoreError> {
        let value = self
            .lookup(key)
            .ok_or_else(|| StoreError::MissingKey(key.to_string()))?;
        serde_json::from_value(value).map_err(|source| StoreError::Type {
            key: key.to_string(),
            source,
        })
    }

    pub fn get_str(&self, key: &str) -> Option<String> {
        self.lookup(key).and_then(|v| v.as_str().map(str::to_owned))
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.lookup(key).and_then(|v| v.as_i64())
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.lookup(key).and_then(|v| v.as_f64())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.lookup(key).and_then(|v| v.as_bool())
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}
