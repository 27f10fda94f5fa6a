//! In-memory key-value store — useful for testing and ephemeral sessions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tablemind_core::error::StorageError;
use tablemind_core::storage::KvStore;
use tokio::sync::RwLock;

/// A key-value store backed by a HashMap.
///
/// Counts writes so tests can assert how many times a debounced save
/// actually reached storage.
pub struct InMemoryKvStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
    puts: Arc<AtomicUsize>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            puts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `put` calls that reached this store.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.write().await.insert(key.to_string(), value);
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.entries.write().await.remove(key).is_some())
    }
}
