//! Routes for starting games and reading session state.

use axum::extract::{Path, State};
use axum::{
    Json, Router,
    routing::{get, post},
};
use bastionlands_session::application::command_handlers::{self, NewGameResult};
use bastionlands_session::application::query_handlers::{
    self, CharacterView, GameStateView, SessionListView,
};
use bastionlands_session::domain::commands;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Response body for POST /session/start.
#[derive(Debug, Serialize)]
pub struct SessionStartResponse {
    /// Id to pass to /new-game.
    pub session_id: Uuid,
}

/// Request body for POST /new-game.
#[derive(Debug, Deserialize)]
pub struct NewGameRequest {
    /// Id reserved through /session/start, if any.
    #[serde(default)]
    pub session_id: Option<Uuid>,
    pub company_name: String,
    /// One to three names.
    pub knight_names: Vec<String>,
    #[serde(default)]
    pub with_squires: bool,
}

/// Response body for GET /game-state/{session_id}.
#[derive(Debug, Serialize)]
pub struct GameStateResponse {
    pub session_id: Uuid,
    pub narrative: String,
    pub game_state: GameStateView,
    pub options: Vec<String>,
}

fn suggested_options(state: &GameStateView) -> Vec<String> {
    let options: &[&str] = if state.combat.is_some() {
        &["Fight on", "Check status"]
    } else if state.moves_remaining == 0 {
        &["Make camp", "Explore this hex", "Check status"]
    } else {
        &["Explore this hex", "Travel onward", "Make camp"]
    };
    options.iter().map(|option| (*option).to_owned()).collect()
}

/// POST /session/start
#[instrument]
async fn start_session() -> Json<SessionStartResponse> {
    let session_id = Uuid::new_v4();
    info!(%session_id, "session id reserved");
    Json(SessionStartResponse { session_id })
}

/// POST /new-game
#[instrument(skip(state, request), fields(company = %request.company_name))]
async fn new_game(
    State(state): State<AppState>,
    Json(request): Json<NewGameRequest>,
) -> Result<Json<NewGameResult>, ApiError> {
    let command = commands::NewGame {
        correlation_id: Uuid::new_v4(),
        session_id: request.session_id,
        company_name: request.company_name,
        knight_names: request.knight_names,
        with_squires: request.with_squires,
    };

    info!(correlation_id = %command.correlation_id, "handling new_game command");

    let result = command_handlers::handle_new_game(
        &command,
        state.clock.as_ref(),
        &state.rng,
        &*state.session_repository,
    )
    .await?;

    Ok(Json(result))
}

/// GET /game-state/{session_id}
#[instrument(skip(state))]
async fn get_game_state(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<GameStateResponse>, ApiError> {
    let game_state =
        query_handlers::get_game_state(session_id, &*state.session_repository).await?;
    Ok(Json(GameStateResponse {
        session_id,
        narrative: "You survey your surroundings...".to_owned(),
        options: suggested_options(&game_state),
        game_state,
    }))
}

/// GET /character/{session_id}/{name}
#[instrument(skip(state))]
async fn get_character(
    State(state): State<AppState>,
    Path((session_id, name)): Path<(Uuid, String)>,
) -> Result<Json<CharacterView>, ApiError> {
    let view =
        query_handlers::get_character(session_id, &name, &*state.session_repository).await?;
    Ok(Json(view))
}

/// GET /sessions
#[instrument(skip(state))]
async fn list_sessions(State(state): State<AppState>) -> Result<Json<SessionListView>, ApiError> {
    let view = query_handlers::list_sessions(&*state.session_repository).await?;
    Ok(Json(view))
}

/// Returns the router for session setup and queries.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session/start", post(start_session))
        .route("/new-game", post(new_game))
        .route("/game-state/{session_id}", get(get_game_state))
        .route("/character/{session_id}/{name}", get(get_character))
        .route("/sessions", get(list_sessions))
}
