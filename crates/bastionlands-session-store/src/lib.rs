//! Session stores for Mythic Bastionlands.
//!
//! Two implementations of `SessionRepository`: an in-process map used when
//! no database is configured, and a PostgreSQL table holding one JSONB
//! snapshot per session. Both enforce optimistic versioning.

pub mod in_memory;
pub mod pg_session_repository;

/// Applies the bundled migrations to `pool`.
///
/// # Errors
///
/// Returns the migrator's error if any migration fails to apply.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
