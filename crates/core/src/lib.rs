//! # Tablemind Core
//!
//! Domain types, traits, and error definitions for the tablemind GM
//! assistant. This crate has **zero framework dependencies** — it defines
//! the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every collaborator is defined as a trait here. Implementations live in
//! their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod fragment;
pub mod history;
pub mod message;
pub mod record;
pub mod storage;
pub mod transport;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result, SnapshotError, StorageError, TransportError, ValidationError};
pub use fragment::{Fragment, FragmentSet};
pub use history::{HistoryPage, HistoryStore};
pub use message::{Message, Role};
pub use record::ExchangeRecord;
pub use storage::KvStore;
pub use transport::{ChatReply, ChatTransport, OutboundMessage};

/// Current wall-clock time as integer milliseconds since the Unix epoch.
///
/// The natural sort and primary key domain for [`ExchangeRecord`].
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
