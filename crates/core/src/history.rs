//! HistoryStore trait — the persistence contract for exchange records.
//!
//! The core only appends and reads; existing records are never mutated.

use crate::error::StorageError;
use crate::record::ExchangeRecord;
use async_trait::async_trait;

/// One page of history, most-recent-first.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPage {
    /// Records ordered by timestamp descending.
    pub records: Vec<ExchangeRecord>,
    /// Total records in the store, across all pages.
    pub total: u64,
}

/// The history persistence contract.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// A human-readable name for this store (e.g. "sqlite").
    fn name(&self) -> &str;

    /// Fetch one page, most-recent-first. Pages are 1-based.
    async fn list(&self, page: u32, limit: u32) -> std::result::Result<HistoryPage, StorageError>;

    /// Append one immutable record. Records sharing a timestamp are all
    /// kept; no deduplication.
    async fn append(&self, record: ExchangeRecord) -> std::result::Result<(), StorageError>;

    /// Delete every record with the given timestamp. Returns whether
    /// anything was found.
    async fn delete_by_timestamp(&self, timestamp: i64)
        -> std::result::Result<bool, StorageError>;
}
