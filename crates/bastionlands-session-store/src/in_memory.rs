//! Process-local session store.

use std::collections::HashMap;

use async_trait::async_trait;
use bastionlands_core::error::DomainError;
use bastionlands_core::repository::{SessionRepository, StoredSession};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Keeps snapshots in a map for the life of the process.
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<Uuid, StoredSession>>,
}

impl InMemorySessionRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn get(&self, session_id: Uuid) -> Result<Option<StoredSession>, DomainError> {
        Ok(self.sessions.read().await.get(&session_id).cloned())
    }

    async fn put(
        &self,
        session: &StoredSession,
        expected_version: i64,
    ) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        let actual = sessions
            .get(&session.session_id)
            .map_or(0, |stored| stored.version);

        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                session_id: session.session_id,
                expected: expected_version,
                actual,
            });
        }

        sessions.insert(session.session_id, session.clone());
        Ok(())
    }

    async fn delete(&self, session_id: Uuid) -> Result<(), DomainError> {
        self.sessions.write().await.remove(&session_id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<StoredSession>, DomainError> {
        let mut sessions: Vec<StoredSession> =
            self.sessions.read().await.values().cloned().collect();
        sessions.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.session_id.cmp(&b.session_id))
        });
        Ok(sessions)
    }
}
