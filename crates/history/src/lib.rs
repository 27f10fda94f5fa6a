//! History persistence and hydration for tablemind.

pub mod hydrator;
pub mod in_memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use hydrator::{EMPTY_PROMPT_PLACEHOLDER, UNREADABLE_RECORD_MARKER, hydrate};
pub use in_memory::InMemoryHistoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteHistoryStore;
