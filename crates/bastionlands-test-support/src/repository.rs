//! Session repositories that misbehave on purpose.

use async_trait::async_trait;
use bastionlands_core::error::DomainError;
use bastionlands_core::repository::{SessionRepository, StoredSession};
use uuid::Uuid;

/// Every call fails with an infrastructure error.
#[derive(Debug)]
pub struct FailingSessionRepository;

fn refused() -> DomainError {
    DomainError::Infrastructure("connection refused".into())
}

#[async_trait]
impl SessionRepository for FailingSessionRepository {
    async fn get(&self, _session_id: Uuid) -> Result<Option<StoredSession>, DomainError> {
        Err(refused())
    }

    async fn put(
        &self,
        _session: &StoredSession,
        _expected_version: i64,
    ) -> Result<(), DomainError> {
        Err(refused())
    }

    async fn delete(&self, _session_id: Uuid) -> Result<(), DomainError> {
        Err(refused())
    }

    async fn list(&self) -> Result<Vec<StoredSession>, DomainError> {
        Err(refused())
    }
}
