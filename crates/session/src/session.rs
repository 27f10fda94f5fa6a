//! The chat session facade.

use std::sync::Arc;
use tablemind_config::AppConfig;
use tablemind_core::error::{Error, Result};
use tablemind_core::fragment::FragmentSet;
use tablemind_core::message::Message;
use tablemind_core::now_millis;
use tablemind_core::record::ExchangeRecord;
use tablemind_core::transport::{ChatTransport, OutboundMessage};
use tablemind_core::{HistoryStore, KvStore};
use tablemind_draft::{DraftCache, FileKvStore, InMemoryKvStore};
use tablemind_history::{InMemoryHistoryStore, hydrate};
use tablemind_transport::OpenAiCompatTransport;
use tracing::{debug, info, warn};

/// Shown as a synthetic assistant message when the history store cannot be
/// read at all. Live submission still works in that state.
const HISTORY_UNAVAILABLE_NOTICE: &str =
    "Failed to load conversation history. You can still start a new exchange.";

/// One facilitator's conversation with the model.
///
/// Owns the full exchange lifecycle: validate and compose the draft, send
/// it, persist the resulting record, and hand back the two thread messages
/// the exchange produced.
pub struct ChatSession {
    transport: Arc<dyn ChatTransport>,
    history: Arc<dyn HistoryStore>,
    drafts: DraftCache,
    model: String,
}

impl ChatSession {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        history: Arc<dyn HistoryStore>,
        drafts: DraftCache,
        model: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            history,
            drafts,
            model: model.into(),
        }
    }

    /// Wire up a session from application configuration: the configured
    /// transport, history backend, and a file-backed draft cache.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let transport = OpenAiCompatTransport::from_config(config)?;

        let history: Arc<dyn HistoryStore> = match config.history.backend.as_str() {
            "in_memory" => Arc::new(InMemoryHistoryStore::new()),
            _ => {
                let path = config.history_db_path();
                let url = format!("sqlite://{}", path.display());
                Arc::new(tablemind_history::SqliteHistoryStore::new(&url).await?)
            }
        };

        let store: Arc<dyn KvStore> = if config.draft.enabled {
            Arc::new(FileKvStore::new(config.draft_file_path()))
        } else {
            Arc::new(InMemoryKvStore::new())
        };
        let drafts = DraftCache::with_debounce(
            store,
            std::time::Duration::from_millis(config.draft.debounce_ms),
        );

        info!(model = %config.default_model, backend = %config.history.backend, "Session ready");
        Ok(Self::new(
            Arc::new(transport),
            history,
            drafts,
            config.default_model.clone(),
        ))
    }

    /// Submit the current fragments as one exchange.
    ///
    /// Composes the prompt, sends it, persists the exchange record, and
    /// returns the `(user, assistant)` message pair, both stamped with the
    /// reply's completion time. A blank prompt or transport failure leaves
    /// history untouched; a failed append is logged but does not discard
    /// the reply already in hand.
    pub async fn submit(&self, fragments: &FragmentSet) -> Result<(Message, Message)> {
        let composed = tablemind_prompt::assemble(fragments)?;

        let outbound = [OutboundMessage::user(composed.user)];
        let reply = self
            .transport
            .send(composed.system.as_deref(), &outbound, &self.model)
            .await?;

        let record = ExchangeRecord::new(reply.timestamp, fragments, Some(reply.content.clone()))?;
        if let Err(e) = self.history.append(record).await {
            warn!(error = %e, timestamp = reply.timestamp, "Reply received but history append failed");
        }

        debug!(timestamp = reply.timestamp, "Exchange completed");
        let user = Message::user(reply.timestamp, fragments.current_prompt.clone(), fragments.clone());
        let assistant = Message::assistant(reply.timestamp, reply.content);
        Ok((user, assistant))
    }

    /// Load the most recent `limit` exchanges as an ordered thread.
    ///
    /// A totally unreadable store degrades to a single synthetic assistant
    /// notice rather than an error; per-record decode faults are already
    /// isolated inside hydration.
    pub async fn load_thread(&self, limit: u32) -> Vec<Message> {
        match self.history.list(1, limit).await {
            Ok(page) => hydrate(&page.records),
            Err(e) => {
                warn!(store = self.history.name(), error = %e, "History unavailable");
                vec![Message::assistant(now_millis(), HISTORY_UNAVAILABLE_NOTICE)]
            }
        }
    }

    /// Delete every exchange stored under `timestamp`.
    pub async fn delete_exchange(&self, timestamp: i64) -> Result<bool> {
        Ok(self.history.delete_by_timestamp(timestamp).await?)
    }

    /// Schedule a debounced save of the in-progress draft.
    pub fn autosave(&self, fragments: FragmentSet) {
        self.drafts.save(fragments);
    }

    /// Persist the draft immediately (shutdown path).
    pub async fn save_draft_now(&self, fragments: FragmentSet) {
        self.drafts.save_now(fragments).await;
    }

    /// Restore the stored draft, or a blank one.
    pub async fn restore_draft(&self) -> FragmentSet {
        self.drafts.load().await
    }

    /// Discard the stored draft. Returns whether one existed.
    pub async fn discard_draft(&self) -> Result<bool> {
        Ok(self.drafts.clear().await.map_err(Error::Storage)?)
    }

    /// Rough token count for the current fragments.
    pub fn estimate_tokens(&self, fragments: &FragmentSet) -> usize {
        tablemind_prompt::estimate(fragments)
    }
}
