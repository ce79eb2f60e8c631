//! Routes that play a turn.

use axum::extract::State;
use axum::{Json, Router, routing::post};
use bastionlands_narrative::domain::intent::Intent;
use bastionlands_session::application::command_handlers::{self, TurnResult};
use bastionlands_session::domain::commands;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /command.
#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub session_id: Uuid,
    /// Free text, up to 500 characters.
    pub command: String,
}

/// Request body for POST /action.
#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub session_id: Uuid,
    /// Intent label; anything unknown is resolved as a risky action.
    pub intent: Intent,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub risk: Option<String>,
}

/// Request body for POST /combat/start.
#[derive(Debug, Deserialize)]
pub struct StartCombatRequest {
    pub session_id: Uuid,
    #[serde(default)]
    pub enemy_type: Option<String>,
}

/// POST /command
#[instrument(skip(state, request), fields(session_id = %request.session_id))]
async fn submit_command(
    State(state): State<AppState>,
    Json(request): Json<CommandRequest>,
) -> Result<Json<TurnResult>, ApiError> {
    let command = commands::SubmitCommand {
        correlation_id: Uuid::new_v4(),
        session_id: request.session_id,
        text: request.command,
    };

    info!(correlation_id = %command.correlation_id, "handling submit_command command");

    let result = command_handlers::handle_submit_command(
        &command,
        state.clock.as_ref(),
        &state.rng,
        &*state.session_repository,
        &state.narrator,
        &state.locks,
    )
    .await?;

    Ok(Json(result))
}

/// POST /action
#[instrument(skip(state, request), fields(session_id = %request.session_id, intent = %request.intent))]
async fn submit_action(
    State(state): State<AppState>,
    Json(request): Json<ActionRequest>,
) -> Result<Json<TurnResult>, ApiError> {
    let command = commands::SubmitAction {
        correlation_id: Uuid::new_v4(),
        session_id: request.session_id,
        intent: request.intent,
        text: request.text,
        risk: request.risk,
    };

    info!(correlation_id = %command.correlation_id, "handling submit_action command");

    let result = command_handlers::handle_submit_action(
        &command,
        state.clock.as_ref(),
        &state.rng,
        &*state.session_repository,
        &state.narrator,
        &state.locks,
    )
    .await?;

    Ok(Json(result))
}

/// POST /combat/start
#[instrument(skip(state, request), fields(session_id = %request.session_id))]
async fn start_combat(
    State(state): State<AppState>,
    Json(request): Json<StartCombatRequest>,
) -> Result<Json<TurnResult>, ApiError> {
    let command = commands::StartCombat {
        correlation_id: Uuid::new_v4(),
        session_id: request.session_id,
        enemy: request.enemy_type,
    };

    info!(correlation_id = %command.correlation_id, "handling start_combat command");

    let result = command_handlers::handle_start_combat(
        &command,
        state.clock.as_ref(),
        &state.rng,
        &*state.session_repository,
        &state.narrator,
        &state.locks,
    )
    .await?;

    Ok(Json(result))
}

/// Returns the router for turn commands.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/command", post(submit_command))
        .route("/action", post(submit_action))
        .route("/combat/start", post(start_combat))
}
