//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use bastionlands_core::determinism::{Clock, DeterministicRng, SeededRng};
use bastionlands_core::repository::SessionRepository;
use bastionlands_narrative::domain::model::LanguageModel;
use bastionlands_session::application::narrator::Narrator;
use bastionlands_session_store::in_memory::InMemorySessionRepository;
use bastionlands_session_store::pg_session_repository::PgSessionRepository;
use bastionlands_test_support::{FailingLanguageModel, FixedClock};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use bastionlands_api::build_router;
use bastionlands_api::state::AppState;

/// Seed shared by all integration tests.
const SEED: u64 = 2026;

/// Build the full app with the given store, model and model timeout. Uses
/// the same router as `main.rs`.
pub fn build_app(
    session_repository: Arc<dyn SessionRepository>,
    model: Arc<dyn LanguageModel>,
    timeout: Duration,
) -> Router {
    let clock: Arc<dyn Clock + Send + Sync> = Arc::new(FixedClock::new_year());
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> =
        Arc::new(Mutex::new(SeededRng::from_seed(SEED)));
    let app_state = AppState::new(
        clock,
        rng,
        session_repository,
        Narrator::new(model, timeout),
    );
    build_router(app_state)
}

/// In-memory app whose model is always unreachable.
pub fn build_test_app() -> Router {
    build_app(
        Arc::new(InMemorySessionRepository::new()),
        Arc::new(FailingLanguageModel),
        Duration::from_secs(1),
    )
}

/// App backed by a real `PgSessionRepository`.
pub fn build_pg_app(pool: PgPool) -> Router {
    build_app(
        Arc::new(PgSessionRepository::new(pool)),
        Arc::new(FailingLanguageModel),
        Duration::from_secs(1),
    )
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Start a one-knight game and return its session id.
pub async fn new_game(app: Router, company: &str) -> String {
    let (status, json) = post_json(
        app,
        "/api/new-game",
        &serde_json::json!({ "company_name": company, "knight_names": ["Ser Alys"] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["session_id"].as_str().unwrap().to_owned()
}
