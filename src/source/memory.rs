//! In-process source backed by a concurrent map.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::source::{RemoteSource, SourceError};

/// A source whose documents are set directly by the embedding process.
///
/// Cloning shares the underlying documents.
#[derive(Clone, Default)]
pub struct StaticSource {
    documents: Arc<DashMap<String, Vec<u8>>>,
    fetches: Arc<AtomicU64>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish (or replace) the content of `filename`.
    pub fn set(&self, filename: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.documents.insert(filename.into(), content.into());
    }

    pub fn remove(&self, filename: &str) {
        self.documents.remove(filename);
    }

    /// Total number of `fetch` calls served, successful or not.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RemoteSource for StaticSource {
    async fn fetch(&self, filename: &str) -> Result<Vec<u8>, SourceError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.documents
            .get(filename)
            .map(|r| r.value().clone())
            .ok_or_else(|| SourceError::NotFound(filename.to_string()))
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_fetch_remove() {
        let source = StaticSource::new();
        let shared = source.clone();

        shared.set("app.yaml", "k: 1");
        assert_eq!(source.fetch("app.yaml").await.unwrap(), b"k: 1");

        shared.remove("app.yaml");
        assert!(matches!(
            source.fetch("app.yaml").await,
            Err(SourceError::NotFound(_))
        ));
        assert_eq!(source.fetch_count(), 2);
    }
}
