//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No game session exists for the identifier.
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    /// The session exists but has no company member with the given name.
    #[error("character not found in session {session_id}: {name}")]
    CharacterNotFound {
        /// The session that was searched.
        session_id: Uuid,
        /// The requested character name.
        name: String,
    },

    /// Optimistic concurrency conflict.
    #[error("concurrency conflict on session {session_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The session that had the conflict.
        session_id: Uuid,
        /// The expected version.
        expected: i64,
        /// The actual version found.
        actual: i64,
    },

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),

    /// A programming error: an internal invariant no longer holds.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}
