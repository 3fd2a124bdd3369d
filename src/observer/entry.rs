//! Per-file bookkeeping and the single-entry reconciliation pass.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::observer::error::ObserverError;
use crate::observer::events::ReloadOutcome;
use crate::observer::fingerprint::{Fingerprint, FingerprintCell};
use crate::source::RemoteSource;
use crate::store::{ConfigFormat, ConfigStore};

/// One tracked remote configuration file.
#[derive(Debug)]
pub struct ConfigEntry {
    filename: String,
    config_name: String,
    format: ConfigFormat,
    store: Arc<ConfigStore>,
    is_default: bool,
    fingerprint: FingerprintCell,
    /// Held for the whole fetch/compare/ingest sequence.
    reconcile_lock: Mutex<()>,
}

/// Split `name.ext` at the last dot.
///
/// Filenames without an extension (or with an empty stem) are rejected
/// rather than registered with an empty format. So are names containing a
/// path separator, which no source can serve.
pub fn split_filename(filename: &str) -> Result<(String, ConfigFormat), ObserverError> {
    let (name, ext) = filename
        .rsplit_once('.')
        .filter(|_| !filename.contains(['/', '\\']))
        .filter(|(name, ext)| !name.is_empty() && !ext.is_empty())
        .ok_or_else(|| ObserverError::InvalidFilename(filename.to_string()))?;

    let format = ConfigFormat::from_extension(ext).ok_or_else(|| ObserverError::UnsupportedFormat {
        filename: filename.to_string(),
        extension: ext.to_string(),
    })?;

    Ok((name.to_string(), format))
}

/// Fetch and parse `filename` once, outside any observer.
///
/// Empty content is rejected exactly as during reconciliation.
pub async fn fetch_once(
    source: &dyn RemoteSource,
    filename: &str,
) -> Result<(Fingerprint, ConfigStore), ObserverError> {
    let (name, format) = split_filename(filename)?;
    let content = fetch_content(source, filename).await?;
    let fingerprint = Fingerprint::of(&content);

    let store = ConfigStore::new();
    store.configure(name, format);
    store
        .ingest(&content)
        .map_err(|source| ObserverError::Ingest {
            filename: filename.to_string(),
            fingerprint,
            source,
        })?;
    Ok((fingerprint, store))
}

async fn fetch_content(
    source: &dyn RemoteSource,
    filename: &str,
) -> Result<Vec<u8>, ObserverError> {
    let content = source
        .fetch(filename)
        .await
        .map_err(|source| ObserverError::SourceFetch {
            filename: filename.to_string(),
            source,
        })?;

    if content.is_empty() {
        return Err(ObserverError::EmptyContent(filename.to_string()));
    }
    Ok(content)
}

impl ConfigEntry {
    /// Create an entry and configure `store` with its name and format.
    pub(crate) fn new(
        filename: &str,
        config_name: String,
        format: ConfigFormat,
        store: Arc<ConfigStore>,
        is_default: bool,
    ) -> Self {
        store.configure(config_name.clone(), format);
        Self {
            filename: filename.to_string(),
            config_name,
            format,
            store,
            is_default,
            fingerprint: FingerprintCell::default(),
            reconcile_lock: Mutex::new(()),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn config_name(&self) -> &str {
        &self.config_name
    }

    pub fn format(&self) -> ConfigFormat {
        self.format
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// Fingerprint of the last ingested content, `None` before the first.
    pub fn fingerprint(&self) -> Option<Fingerprint> {
        self.fingerprint.load()
    }

    /// Fetch the file and re-ingest it if its content changed.
    ///
    /// The fingerprint moves before ingesting, so a document the store
    /// rejects is only parsed again once its bytes change.
    pub async fn reconcile(
        &self,
        source: &dyn RemoteSource,
    ) -> Result<ReloadOutcome, ObserverError> {
        let _guard = self.reconcile_lock.lock().await;
        let content = fetch_content(source, &self.filename).await?;

        let fingerprint = Fingerprint::of(&content);
        if self.fingerprint.load() == Some(fingerprint) {
            return Ok(ReloadOutcome::Unchanged);
        }

        self.fingerprint.store(fingerprint);
        self.store
            .ingest(&content)
            .map_err(|source| ObserverError::Ingest {
                filename: self.filename.clone(),
                fingerprint,
                source,
            })?;

        Ok(ReloadOutcome::Reloaded { fingerprint })
    }
}
