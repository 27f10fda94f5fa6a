//! Session orchestration for tablemind.
//!
//! [`ChatSession`] is the facade the presentation layer talks to: it
//! composes prompts, drives the transport, persists exchanges, hydrates
//! the visible thread, and keeps the in-progress draft alive.

pub mod session;

pub use session::ChatSession;
