//! File-backed key-value storage.
//!
//! One JSON file per key under the application data directory. Writes
//! land in a temp file first and are moved into place with a rename, so
//! an interrupted save never leaves a torn document behind.

use std::path::Path;

use introvert_core::error::Result;
use introvert_core::storage::KeyValueStorage;

use crate::paths::IntrovertPaths;

/// Key-value storage persisting each key as `<key>.json`.
pub struct JsonFileStorage {
    paths: IntrovertPaths,
}

impl JsonFileStorage {
    /// Creates a storage rooted at the platform data directory.
    pub async fn default() -> Result<Self> {
        Self::new(None).await
    }

    /// Creates a storage rooted at `base_dir` (for testing), ensuring
    /// the directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be resolved or created.
    pub async fn new(base_dir: Option<&Path>) -> Result<Self> {
        let paths = IntrovertPaths::new(base_dir);
        tokio::fs::create_dir_all(paths.data_dir()?).await?;
        Ok(Self { paths })
    }
}

#[async_trait::async_trait]
impl KeyValueStorage for JsonFileStorage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.paths.document_file(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        let path = self.paths.document_file(key)?;
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, value).await?;
        tokio::fs::rename(&tmp_path, &path).await?;
        tracing::debug!("persisted document for key '{key}' ({} bytes)", value.len());
        Ok(())
    }
}
