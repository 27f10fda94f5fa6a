//! In-memory history store — useful for testing and ephemeral sessions.

use async_trait::async_trait;
use std::sync::Arc;
use tablemind_core::error::StorageError;
use tablemind_core::history::{HistoryPage, HistoryStore};
use tablemind_core::record::ExchangeRecord;
use tokio::sync::RwLock;

/// A history store that keeps exchange records in a Vec.
pub struct InMemoryHistoryStore {
    records: Arc<RwLock<Vec<ExchangeRecord>>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn list(&self, page: u32, limit: u32) -> Result<HistoryPage, StorageError> {
        let records = self.records.read().await;
        let total = records.len() as u64;

        let mut ordered: Vec<ExchangeRecord> = records.clone();
        // Most-recent-first, like the paginated SQL source.
        ordered.sort_by_key(|r| std::cmp::Reverse(r.timestamp));

        let offset = (page.max(1) as usize - 1) * limit as usize;
        let page_records = ordered
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .collect();

        Ok(HistoryPage {
            records: page_records,
            total,
        })
    }

    async fn append(&self, record: ExchangeRecord) -> Result<(), StorageError> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn delete_by_timestamp(&self, timestamp: i64) -> Result<bool, StorageError> {
        let mut records = self.records.write().await;
        let len_before = records.len();
        records.retain(|r| r.timestamp != timestamp);
        Ok(records.len() < len_before)
    }
}
