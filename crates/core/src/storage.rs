//! KvStore trait — asynchronous key-value persistence for the draft cache.
//!
//! Values are opaque strings (in practice JSON documents). The draft cache
//! uses exactly one reserved key; the trait stays general so other
//! single-slot state can share an implementation.

use crate::error::StorageError;
use async_trait::async_trait;

/// Asynchronous get/put/delete by key.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// A human-readable name for this store (e.g. "file", "in_memory").
    fn name(&self) -> &str;

    /// Fetch the value stored under `key`, if any.
    async fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError>;

    /// Store `value` under `key`, overwriting any previous value.
    async fn put(&self, key: &str, value: String) -> std::result::Result<(), StorageError>;

    /// Delete the value under `key`. Returns whether anything was found.
    async fn delete(&self, key: &str) -> std::result::Result<bool, StorageError>;
}
