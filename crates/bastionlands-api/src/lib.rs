//! HTTP surface for the Mythic Bastionlands engine.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the full application router.
pub fn build_router(app_state: AppState) -> Router {
    // TODO: restrict CORS origins once the web client's host is settled.
    Router::new()
        .merge(routes::health::router())
        .nest(
            "/api",
            routes::session::router().merge(routes::turn::router()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
