//! Local directory source.
//!
//! Reads documents from a directory, typically one that a deployment agent
//! keeps in sync with the configuration service.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::source::{check_filename, RemoteSource, SourceError};

pub struct DirectorySource {
    root: PathBuf,
    name: String,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            name: format!("directory:{}", root.display()),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl RemoteSource for DirectorySource {
    async fn fetch(&self, filename: &str) -> Result<Vec<u8>, SourceError> {
        check_filename(filename)?;
        let path = self.root.join(filename);

        match tokio::fs::read(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(SourceError::NotFound(filename.to_string()))
            }
            Err(source) => Err(SourceError::Io { path, source }),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.yaml"), "k: 1").unwrap();

        let source = DirectorySource::new(dir.path());
        assert_eq!(source.fetch("app.yaml").await.unwrap(), b"k: 1");
        assert!(matches!(
            source.fetch("other.yaml").await,
            Err(SourceError::NotFound(name)) if name == "other.yaml"
        ));
        assert!(matches!(
            source.fetch("../app.yaml").await,
            Err(SourceError::InvalidFilename(_))
        ));
    }
}
