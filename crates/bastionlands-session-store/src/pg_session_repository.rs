//! `PostgreSQL` implementation of the `SessionRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use bastionlands_core::error::DomainError;
use bastionlands_core::repository::{SessionRepository, StoredSession};

/// PostgreSQL-backed session repository. One row per session in
/// `game_sessions`, holding the latest snapshot and its version.
#[derive(Debug, Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Creates a new `PgSessionRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn current_version(&self, session_id: Uuid) -> Result<i64, DomainError> {
        let version: Option<i64> =
            sqlx::query_scalar("SELECT version FROM game_sessions WHERE session_id = $1")
                .bind(session_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(infrastructure)?;
        Ok(version.unwrap_or(0))
    }
}

#[derive(Debug, FromRow)]
struct SessionRow {
    session_id: Uuid,
    company_name: String,
    turn_count: i64,
    version: i64,
    payload: serde_json::Value,
    updated_at: DateTime<Utc>,
}

impl From<SessionRow> for StoredSession {
    fn from(row: SessionRow) -> Self {
        Self {
            session_id: row.session_id,
            company_name: row.company_name,
            turn_count: row.turn_count,
            version: row.version,
            payload: row.payload,
            updated_at: row.updated_at,
        }
    }
}

#[allow(clippy::needless_pass_by_value)]
fn infrastructure(err: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(format!("session store: {err}"))
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn get(&self, session_id: Uuid) -> Result<Option<StoredSession>, DomainError> {
        let row: Option<SessionRow> = sqlx::query_as(
            "SELECT session_id, company_name, turn_count, version, payload, updated_at \
             FROM game_sessions WHERE session_id = $1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(infrastructure)?;

        Ok(row.map(StoredSession::from))
    }

    async fn put(
        &self,
        session: &StoredSession,
        expected_version: i64,
    ) -> Result<(), DomainError> {
        let result = if expected_version == 0 {
            sqlx::query(
                "INSERT INTO game_sessions \
                 (session_id, company_name, turn_count, version, payload, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 ON CONFLICT (session_id) DO NOTHING",
            )
            .bind(session.session_id)
            .bind(&session.company_name)
            .bind(session.turn_count)
            .bind(session.version)
            .bind(&session.payload)
            .bind(session.updated_at)
            .execute(&self.pool)
            .await
        } else {
            sqlx::query(
                "UPDATE game_sessions \
                 SET company_name = $2, turn_count = $3, version = $4, payload = $5, \
                     updated_at = $6 \
                 WHERE session_id = $1 AND version = $7",
            )
            .bind(session.session_id)
            .bind(&session.company_name)
            .bind(session.turn_count)
            .bind(session.version)
            .bind(&session.payload)
            .bind(session.updated_at)
            .bind(expected_version)
            .execute(&self.pool)
            .await
        }
        .map_err(infrastructure)?;

        if result.rows_affected() == 0 {
            let actual = self.current_version(session.session_id).await?;
            return Err(DomainError::ConcurrencyConflict {
                session_id: session.session_id,
                expected: expected_version,
                actual,
            });
        }

        debug!(session_id = %session.session_id, version = session.version, "session snapshot written");
        Ok(())
    }

    async fn delete(&self, session_id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM game_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(infrastructure)?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<StoredSession>, DomainError> {
        let rows: Vec<SessionRow> = sqlx::query_as(
            "SELECT session_id, company_name, turn_count, version, payload, updated_at \
             FROM game_sessions ORDER BY updated_at DESC, session_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(infrastructure)?;

        Ok(rows.into_iter().map(StoredSession::from).collect())
    }
}
