//! The single-slot draft cache.
//!
//! Holds at most one in-progress [`FragmentSet`] under a reserved key.
//! Saves are debounced on the trailing edge so a typing burst costs one
//! write, and storage failures are logged and swallowed — a broken disk
//! must never interrupt composition.

use crate::debounce::Debouncer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tablemind_core::error::StorageError;
use tablemind_core::fragment::FragmentSet;
use tablemind_core::now_millis;
use tablemind_core::storage::KvStore;
use tracing::{debug, warn};

/// The reserved slot key. There is exactly one draft at a time.
pub const DRAFT_KEY: &str = "current_draft";

/// What actually lands in storage: the draft plus when it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftEntry {
    pub fragments: FragmentSet,
    pub last_updated: i64,
}

/// Debounced single-slot persistence for the in-progress draft.
pub struct DraftCache {
    store: Arc<dyn KvStore>,
    debouncer: Debouncer,
}

impl DraftCache {
    /// Default trailing-edge window between the last edit and the write.
    pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self::with_debounce(store, Self::DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(store: Arc<dyn KvStore>, window: Duration) -> Self {
        Self {
            store,
            debouncer: Debouncer::new(window),
        }
    }

    /// Schedule a debounced save of `fragments`.
    ///
    /// Returns immediately. Only the newest pending draft is written once
    /// the window elapses; earlier pending saves are superseded, but a
    /// write that has already begun is never interrupted.
    pub fn save(&self, fragments: FragmentSet) {
        let store = Arc::clone(&self.store);
        self.debouncer.schedule(move || async move {
            write_entry(store.as_ref(), fragments).await;
        });
    }

    /// Persist `fragments` right now, bypassing the debounce window.
    ///
    /// Used at shutdown, where waiting out the window would lose the edit.
    /// Supersedes any pending debounced save first, so a timer armed by an
    /// earlier `save` cannot fire later and overwrite this value.
    pub async fn save_now(&self, fragments: FragmentSet) {
        self.debouncer.cancel();
        write_entry(self.store.as_ref(), fragments).await;
    }

    /// Restore the stored draft, or a blank one when nothing is stored.
    ///
    /// A storage or decode failure degrades to the blank draft rather than
    /// surfacing: losing a draft is recoverable, blocking startup is not.
    pub async fn load(&self) -> FragmentSet {
        match self.store.get(DRAFT_KEY).await {
            Ok(Some(payload)) => match serde_json::from_str::<DraftEntry>(&payload) {
                Ok(entry) => {
                    debug!(last_updated = entry.last_updated, "Restored draft");
                    entry.fragments
                }
                Err(e) => {
                    warn!(error = %e, "Stored draft is unreadable, starting blank");
                    FragmentSet::default()
                }
            },
            Ok(None) => FragmentSet::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read draft, starting blank");
                FragmentSet::default()
            }
        }
    }

    /// Whether a draft is currently stored. A storage failure reads as
    /// "no draft", like `load`.
    pub async fn has_draft(&self) -> bool {
        match self.store.get(DRAFT_KEY).await {
            Ok(stored) => stored.is_some(),
            Err(e) => {
                warn!(error = %e, "Failed to check for a stored draft");
                false
            }
        }
    }

    /// Discard the stored draft. Returns whether one existed.
    pub async fn clear(&self) -> Result<bool, StorageError> {
        self.store.delete(DRAFT_KEY).await
    }
}

async fn write_entry(store: &dyn KvStore, fragments: FragmentSet) {
    let entry = DraftEntry {
        fragments,
        last_updated: now_millis(),
    };
    let payload = match serde_json::to_string(&entry) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "Failed to encode draft, skipping save");
            return;
        }
    };
    if let Err(e) = store.put(DRAFT_KEY, payload).await {
        warn!(store = store.name(), error = %e, "Draft save failed");
    } else {
        debug!(store = store.name(), "Draft saved");
    }
}
