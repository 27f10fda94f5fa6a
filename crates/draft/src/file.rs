//! File-backed key-value store.
//!
//! A single JSON document on disk holding a string-to-string map. The file
//! is read lazily on first access and the in-memory map is authoritative
//! afterwards; every mutation rewrites the whole document. Construction is
//! explicit and cheap — no I/O happens until a key is touched.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tablemind_core::error::StorageError;
use tablemind_core::storage::KvStore;
use tokio::sync::{OnceCell, RwLock};
use tracing::debug;

/// A key-value store persisted to a single JSON file.
pub struct FileKvStore {
    path: PathBuf,
    state: OnceCell<RwLock<HashMap<String, String>>>,
}

impl FileKvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: OnceCell::new(),
        }
    }

    /// Load the backing file exactly once; a missing file is an empty map.
    async fn entries(&self) -> Result<&RwLock<HashMap<String, String>>, StorageError> {
        self.state
            .get_or_try_init(|| async {
                let map = match tokio::fs::read_to_string(&self.path).await {
                    Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                        StorageError::Serialization(format!(
                            "corrupt store file {}: {e}",
                            self.path.display()
                        ))
                    })?,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
                    Err(e) => {
                        return Err(StorageError::Storage(format!(
                            "failed to read {}: {e}",
                            self.path.display()
                        )));
                    }
                };
                debug!(path = %self.path.display(), entries = map.len(), "Loaded file store");
                Ok(RwLock::new(map))
            })
            .await
    }

    async fn persist(&self, map: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Storage(format!("failed to create dir: {e}")))?;
        }
        let payload = serde_json::to_string_pretty(map)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        tokio::fs::write(&self.path, payload)
            .await
            .map_err(|e| {
                StorageError::Storage(format!("failed to write {}: {e}", self.path.display()))
            })
    }
}

#[async_trait]
impl KvStore for FileKvStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries().await?;
        Ok(entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StorageError> {
        let entries = self.entries().await?;
        let mut map = entries.write().await;
        map.insert(key.to_string(), value);
        self.persist(&map).await
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let entries = self.entries().await?;
        let mut map = entries.write().await;
        let found = map.remove(key).is_some();
        if found {
            self.persist(&map).await?;
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKvStore::new(dir.path().join("drafts.json"));
        assert_eq!(store.get("anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn values_survive_a_fresh_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drafts.json");

        let store = FileKvStore::new(&path);
        store.put("slot", "payload".into()).await.unwrap();

        let reopened = FileKvStore::new(&path);
        assert_eq!(
            reopened.get("slot").await.unwrap().as_deref(),
            Some("payload")
        );
    }

    #[tokio::test]
    async fn delete_rewrites_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drafts.json");

        let store = FileKvStore::new(&path);
        store.put("slot", "payload".into()).await.unwrap();
        assert!(store.delete("slot").await.unwrap());
        assert!(!store.delete("slot").await.unwrap());

        let reopened = FileKvStore::new(&path);
        assert_eq!(reopened.get("slot").await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drafts.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        let store = FileKvStore::new(&path);
        assert!(store.get("slot").await.is_err());
    }
}
