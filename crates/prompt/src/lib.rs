//! Prompt composition — the core architectural component.
//!
//! Turns a [`FragmentSet`](tablemind_core::FragmentSet) into an ordered,
//! role-tagged outbound prompt:
//!
//! 1. **System** (`system_prompt`) — split off as a separate system-role
//!    message, never concatenated into the user body
//! 2. **User body** — the remaining fragments as labeled sections in one
//!    fixed canonical order, `current_prompt` always last
//!
//! # Determinism
//!
//! Composition is deterministic: identical inputs always produce
//! byte-identical output. No truncation, no random or time-dependent logic.

pub mod composer;
pub mod token;

pub use composer::{ComposedPrompt, assemble};
pub use token::estimate;
