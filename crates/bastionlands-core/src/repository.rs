//! Session repository abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;

/// Stored representation of a game session snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    /// Session identifier.
    pub session_id: Uuid,
    /// Company name, duplicated out of the payload for listings.
    pub company_name: String,
    /// Turn counter, duplicated out of the payload for listings.
    pub turn_count: i64,
    /// Monotonically increasing version; bumped on every write.
    pub version: i64,
    /// Serialized session state.
    pub payload: serde_json::Value,
    /// Timestamp of the write that produced this version.
    pub updated_at: DateTime<Utc>,
}

/// Repository trait for loading and saving game session snapshots.
///
/// Writes use optimistic concurrency: `expected_version` is the version the
/// caller loaded (0 for a brand-new session). A mismatch yields
/// `DomainError::ConcurrencyConflict`.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Load a session snapshot, or `None` if the id is unknown.
    async fn get(&self, session_id: Uuid) -> Result<Option<StoredSession>, DomainError>;

    /// Insert or replace a session snapshot.
    async fn put(&self, session: &StoredSession, expected_version: i64)
    -> Result<(), DomainError>;

    /// Remove a session. Deleting an unknown id is not an error.
    async fn delete(&self, session_id: Uuid) -> Result<(), DomainError>;

    /// List all stored sessions, most recently updated first.
    async fn list(&self) -> Result<Vec<StoredSession>, DomainError>;
}
