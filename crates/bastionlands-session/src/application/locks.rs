//! Per-session turn serialization.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bastionlands_core::error::DomainError;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// Registry of async mutexes keyed by session id. Turns on one session run
/// one at a time; different sessions never wait on each other.
#[derive(Debug, Default)]
pub struct SessionLocks {
    locks: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl SessionLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive use of `session_id`. The lock is released when
    /// the guard drops.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the registry mutex is poisoned.
    pub async fn acquire(&self, session_id: Uuid) -> Result<OwnedMutexGuard<()>, DomainError> {
        let lock = {
            let mut locks = self.locks.lock().map_err(|e| {
                DomainError::Infrastructure(format!("session lock registry poisoned: {e}"))
            })?;
            // Entries nobody holds or waits on can be dropped.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(session_id).or_default())
        };
        Ok(lock.lock_owned().await)
    }

    /// Sessions with a turn running or waiting.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the registry mutex is poisoned.
    pub fn busy(&self) -> Result<usize, DomainError> {
        let locks = self.locks.lock().map_err(|e| {
            DomainError::Infrastructure(format!("session lock registry poisoned: {e}"))
        })?;
        Ok(locks
            .values()
            .filter(|lock| Arc::strong_count(lock) > 1)
            .count())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_same_session_waits_for_the_holder() {
        // Arrange
        let locks = SessionLocks::new();
        let session_id = Uuid::new_v4();
        let held = locks.acquire(session_id).await.unwrap();

        // Act
        let second = tokio::time::timeout(Duration::from_millis(50), locks.acquire(session_id)).await;

        // Assert
        assert!(second.is_err());
        drop(held);
        assert!(locks.acquire(session_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_different_sessions_do_not_block() {
        let locks = SessionLocks::new();
        let _first = locks.acquire(Uuid::new_v4()).await.unwrap();

        let second =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire(Uuid::new_v4())).await;

        assert!(second.is_ok());
        assert_eq!(locks.busy().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_released_locks_are_pruned() {
        let locks = SessionLocks::new();
        drop(locks.acquire(Uuid::new_v4()).await.unwrap());

        let _held = locks.acquire(Uuid::new_v4()).await.unwrap();

        assert_eq!(locks.locks.lock().unwrap().len(), 1);
        assert_eq!(locks.busy().unwrap(), 1);
    }
}
