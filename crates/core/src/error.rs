//! Error types for the tablemind domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all tablemind operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Validation errors (resolved locally, before any network call) ---
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // --- Transport errors ---
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    // --- Persistence errors ---
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    // --- Snapshot parse errors ---
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Submission refused before composition; never reaches the transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("current prompt must not be blank")]
    EmptyPrompt,
}

/// Failure of the remote LLM call. Surfaces to the thread as one visible
/// failure entry; prior thread state is untouched.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Malformed response body: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Persistence-engine failure (history store or draft key-value store).
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

/// A persisted fragment snapshot that could not be decoded.
///
/// Hydration isolates this to the offending record; it never aborts a batch.
#[derive(Debug, Clone, Error)]
pub enum SnapshotError {
    #[error("fragment snapshot is not valid JSON: {0}")]
    Malformed(String),
}
