//! Integration tests for `PgSessionRepository`.

use bastionlands_core::error::DomainError;
use bastionlands_core::repository::{SessionRepository, StoredSession};
use bastionlands_session_store::pg_session_repository::PgSessionRepository;
use chrono::{TimeZone, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Helper to build a snapshot at a whole-second timestamp.
fn make_snapshot(session_id: Uuid, version: i64, hour: u32) -> StoredSession {
    StoredSession {
        session_id,
        company_name: "The Ashen Oath".to_string(),
        turn_count: version - 1,
        version,
        payload: serde_json::json!({"turn_count": version - 1}),
        updated_at: Utc.with_ymd_and_hms(2026, 1, 15, hour, 0, 0).unwrap(),
    }
}

// --- get ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_get_returns_none_for_unknown_session(pool: PgPool) {
    let repo = PgSessionRepository::new(pool);

    let loaded = repo.get(Uuid::new_v4()).await.unwrap();

    assert!(loaded.is_none());
}

// --- put + get round-trip ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_insert_and_load_snapshot(pool: PgPool) {
    let repo = PgSessionRepository::new(pool);
    let session_id = Uuid::new_v4();
    let snapshot = make_snapshot(session_id, 1, 10);

    repo.put(&snapshot, 0).await.unwrap();

    let loaded = repo.get(session_id).await.unwrap().unwrap();
    assert_eq!(loaded, snapshot);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_update_replaces_snapshot(pool: PgPool) {
    let repo = PgSessionRepository::new(pool);
    let session_id = Uuid::new_v4();
    repo.put(&make_snapshot(session_id, 1, 10), 0).await.unwrap();

    let next = make_snapshot(session_id, 2, 11);
    repo.put(&next, 1).await.unwrap();

    let loaded = repo.get(session_id).await.unwrap().unwrap();
    assert_eq!(loaded.version, 2);
    assert_eq!(loaded.turn_count, 1);
    assert_eq!(loaded.payload, serde_json::json!({"turn_count": 1}));
}

// --- optimistic concurrency ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_stale_update_returns_concurrency_conflict(pool: PgPool) {
    let repo = PgSessionRepository::new(pool);
    let session_id = Uuid::new_v4();
    repo.put(&make_snapshot(session_id, 1, 10), 0).await.unwrap();
    repo.put(&make_snapshot(session_id, 2, 11), 1).await.unwrap();

    let result = repo.put(&make_snapshot(session_id, 2, 12), 1).await;

    match result {
        Err(DomainError::ConcurrencyConflict {
            session_id: id,
            expected,
            actual,
        }) => {
            assert_eq!(id, session_id);
            assert_eq!(expected, 1);
            assert_eq!(actual, 2);
        }
        other => panic!("expected ConcurrencyConflict, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_duplicate_insert_returns_concurrency_conflict(pool: PgPool) {
    let repo = PgSessionRepository::new(pool);
    let session_id = Uuid::new_v4();
    repo.put(&make_snapshot(session_id, 1, 10), 0).await.unwrap();

    let result = repo.put(&make_snapshot(session_id, 1, 10), 0).await;

    assert!(matches!(
        result,
        Err(DomainError::ConcurrencyConflict { actual: 1, .. })
    ));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_update_of_missing_session_reports_version_zero(pool: PgPool) {
    let repo = PgSessionRepository::new(pool);

    let result = repo.put(&make_snapshot(Uuid::new_v4(), 4, 10), 3).await;

    assert!(matches!(
        result,
        Err(DomainError::ConcurrencyConflict { actual: 0, .. })
    ));
}

// --- delete / list ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_removes_session(pool: PgPool) {
    let repo = PgSessionRepository::new(pool);
    let session_id = Uuid::new_v4();
    repo.put(&make_snapshot(session_id, 1, 10), 0).await.unwrap();

    repo.delete(session_id).await.unwrap();

    assert!(repo.get(session_id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_returns_most_recent_first(pool: PgPool) {
    let repo = PgSessionRepository::new(pool);
    let older = Uuid::new_v4();
    let newer = Uuid::new_v4();
    repo.put(&make_snapshot(older, 1, 8), 0).await.unwrap();
    repo.put(&make_snapshot(newer, 1, 14), 0).await.unwrap();

    let listed = repo.list().await.unwrap();

    let ids: Vec<Uuid> = listed.iter().map(|s| s.session_id).collect();
    assert_eq!(ids, vec![newer, older]);
}
