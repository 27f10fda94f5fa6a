//! Draft persistence for tablemind.
//!
//! The in-progress [`FragmentSet`](tablemind_core::FragmentSet) survives
//! session restarts through a single-slot, debounced cache: rapid edits
//! coalesce into one deferred write of the latest value, and storage
//! failures degrade gracefully instead of interrupting the editor.

pub mod cache;
pub mod debounce;
pub mod file;
pub mod memory;

pub use cache::{DRAFT_KEY, DraftCache, DraftEntry};
pub use debounce::Debouncer;
pub use file::FileKvStore;
pub use memory::InMemoryKvStore;
