//! ExchangeRecord — one completed request/response pair.

use crate::error::SnapshotError;
use crate::fragment::FragmentSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted exchange: the fragment snapshot submitted and the response
/// it produced.
///
/// Immutable once created; deletable only by timestamp. The timestamp is
/// epoch milliseconds and serves as the natural sort key. It is *not*
/// guaranteed globally unique — two exchanges completing in the same
/// millisecond both survive, and no deduplication is performed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRecord {
    /// Epoch milliseconds; natural sort and lookup key.
    pub timestamp: i64,

    /// JSON-encoded [`FragmentSet`] snapshot taken at submission time.
    pub fragments: String,

    /// The response text, if the exchange completed with one.
    pub response: Option<String>,

    /// When the row was created, if the store recorded it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ExchangeRecord {
    /// Snapshot a fragment set into a new record.
    pub fn new(
        timestamp: i64,
        fragments: &FragmentSet,
        response: Option<String>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            timestamp,
            fragments: serde_json::to_string(fragments)?,
            response,
            created_at: None,
        })
    }

    /// Decode the fragment snapshot.
    ///
    /// Fails with [`SnapshotError`] on malformed snapshots; callers that
    /// must not abort (hydration) substitute a placeholder instead.
    pub fn snapshot(&self) -> Result<FragmentSet, SnapshotError> {
        serde_json::from_str(&self.fragments)
            .map_err(|e| SnapshotError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_round_trip() {
        let mut set = FragmentSet::default();
        set.current_prompt = "Roll initiative".into();
        set.game_log = "The door creaks open.".into();

        let record = ExchangeRecord::new(1_700_000_000_000, &set, Some("Goblins!".into()))
            .unwrap();
        let decoded = record.snapshot().unwrap();
        assert_eq!(decoded, set);
        assert_eq!(record.response.as_deref(), Some("Goblins!"));
    }

    #[test]
    fn malformed_snapshot_is_an_error() {
        let record = ExchangeRecord {
            timestamp: 42,
            fragments: "not json at all".into(),
            response: None,
            created_at: None,
        };
        assert!(record.snapshot().is_err());
    }
}
