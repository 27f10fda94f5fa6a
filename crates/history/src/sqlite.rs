//! SQLite history store.
//!
//! One `exchanges` table keyed by epoch-millisecond timestamp. The
//! timestamp column is indexed but deliberately *not* a primary key:
//! two exchanges completing in the same millisecond both persist, and
//! deletion by timestamp removes every colliding row.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tablemind_core::error::StorageError;
use tablemind_core::history::{HistoryPage, HistoryStore};
use tablemind_core::record::ExchangeRecord;
use tracing::{debug, info};

/// A SQLite-backed history store.
pub struct SqliteHistoryStore {
    pool: SqlitePool,
}

impl SqliteHistoryStore {
    /// Create a new store from a file path.
    ///
    /// The database and table are created automatically. Pass
    /// `"sqlite::memory:"` for an in-process ephemeral database (tests).
    pub async fn new(path: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StorageError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite history store initialized at {path}");
        Ok(store)
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StorageError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StorageError> {
        // time_stamp is NOT unique: same-millisecond exchanges coexist.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS exchanges (
                time_stamp  INTEGER NOT NULL,
                user_input  TEXT NOT NULL,
                ai_response TEXT,
                created_at  TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::MigrationFailed(format!("exchanges table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_exchanges_time_stamp ON exchanges(time_stamp DESC)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::MigrationFailed(format!("time_stamp index: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<ExchangeRecord, StorageError> {
        let timestamp: i64 = row
            .try_get("time_stamp")
            .map_err(|e| StorageError::QueryFailed(format!("time_stamp column: {e}")))?;
        let fragments: String = row
            .try_get("user_input")
            .map_err(|e| StorageError::QueryFailed(format!("user_input column: {e}")))?;
        let response: Option<String> = row
            .try_get("ai_response")
            .map_err(|e| StorageError::QueryFailed(format!("ai_response column: {e}")))?;
        let created_at_str: String = row
            .try_get("created_at")
            .map_err(|e| StorageError::QueryFailed(format!("created_at column: {e}")))?;

        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .ok();

        Ok(ExchangeRecord {
            timestamp,
            fragments,
            response,
            created_at,
        })
    }
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn list(&self, page: u32, limit: u32) -> Result<HistoryPage, StorageError> {
        let offset = (page.max(1) as i64 - 1) * limit as i64;

        let rows = sqlx::query(
            r#"
            SELECT time_stamp, user_input, ai_response, created_at
            FROM exchanges
            ORDER BY time_stamp DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::QueryFailed(format!("SELECT page: {e}")))?;

        let records = rows
            .iter()
            .map(Self::row_to_record)
            .collect::<Result<Vec<_>, _>>()?;

        let count_row = sqlx::query("SELECT COUNT(*) AS total FROM exchanges")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::QueryFailed(format!("COUNT: {e}")))?;
        let total: i64 = count_row
            .try_get("total")
            .map_err(|e| StorageError::QueryFailed(format!("total column: {e}")))?;

        Ok(HistoryPage {
            records,
            total: total as u64,
        })
    }

    async fn append(&self, record: ExchangeRecord) -> Result<(), StorageError> {
        let created_at = record
            .created_at
            .unwrap_or_else(Utc::now)
            .to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO exchanges (time_stamp, user_input, ai_response, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(record.timestamp)
        .bind(&record.fragments)
        .bind(&record.response)
        .bind(&created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Storage(format!("INSERT failed: {e}")))?;

        debug!(timestamp = record.timestamp, "Appended exchange record");
        Ok(())
    }

    async fn delete_by_timestamp(&self, timestamp: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM exchanges WHERE time_stamp = ?1")
            .bind(timestamp)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Storage(format!("DELETE failed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}
