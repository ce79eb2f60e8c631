//! Command handlers for the session context.
//!
//! A turn runs under its session's lock: load the snapshot, work out what
//! the player meant, resolve it with the rules, narrate the result and
//! persist with an optimistic version check.

use std::sync::Mutex;

use bastionlands_core::determinism::{Clock, DeterministicRng};
use bastionlands_core::error::DomainError;
use bastionlands_core::repository::SessionRepository;
use bastionlands_narrative::domain::intent::Intent;
use bastionlands_narrative::domain::interpretation::Interpretation;
use bastionlands_rules::domain::character::KNIGHTLY_OATH;
use bastionlands_rules::domain::combat::EnemyKind;
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::locks::SessionLocks;
use crate::application::narrator::Narrator;
use crate::application::query_handlers::{GameStateView, load_session};
use crate::domain::commands::{NewGame, StartCombat, SubmitAction, SubmitCommand};
use crate::domain::context::summarize;
use crate::domain::game_session::GameSession;
use crate::domain::turn::{TurnEvent, apply_turn};

/// Longest accepted player input, in characters.
pub const MAX_INPUT_LEN: usize = 500;

/// Result of starting a new game.
#[derive(Debug, Serialize)]
pub struct NewGameResult {
    pub session_id: Uuid,
    pub narrative: String,
    pub game_state: GameStateView,
    pub options: Vec<String>,
}

/// Result of a played turn.
#[derive(Debug, Serialize)]
pub struct TurnResult {
    pub session_id: Uuid,
    pub narrative: String,
    pub game_state: GameStateView,
    pub options: Vec<String>,
    /// How the player's input was understood.
    pub interpretation: Interpretation,
    pub outcome: TurnEvent,
}

fn validate_input(text: &str) -> Result<&str, DomainError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation("command must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_INPUT_LEN {
        return Err(DomainError::Validation(format!(
            "command must be at most {MAX_INPUT_LEN} characters"
        )));
    }
    Ok(trimmed)
}

/// Bumps the version and writes the snapshot, expecting the store to still
/// hold the version it was loaded at.
async fn save_session(
    session: &mut GameSession,
    clock: &dyn Clock,
    repo: &dyn SessionRepository,
) -> Result<(), DomainError> {
    let expected = session.version;
    session.version += 1;
    let stored = session.to_stored(clock.now())?;
    repo.put(&stored, expected).await
}

fn opening_narrative(session: &GameSession) -> String {
    let knights = session.company.knights().count();
    let sworn = if knights == 1 {
        "1 knight has".to_owned()
    } else {
        format!("{knights} knights have")
    };
    format!(
        "{} stands ready at the edge of the realm.\n{sworn} sworn the oath: {}.\n\nYour journey begins in the borderlands...",
        session.company.name,
        KNIGHTLY_OATH.join(". ")
    )
}

/// Handles the `NewGame` command: rolls the company and the starting hexes
/// and stores the session at version 1.
///
/// # Errors
///
/// Returns `DomainError::Validation` for bad names or knight counts,
/// `DomainError::ConcurrencyConflict` if the reserved id is already in use,
/// and `DomainError::Infrastructure` if the RNG or the store fails.
pub async fn handle_new_game(
    command: &NewGame,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    repo: &dyn SessionRepository,
) -> Result<NewGameResult, DomainError> {
    let session_id = command.session_id.unwrap_or_else(Uuid::new_v4);

    // Lock RNG only for the synchronous domain method, never across an await.
    let mut session = {
        let mut rng_guard = rng
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
        GameSession::new_game(
            session_id,
            &command.company_name,
            &command.knight_names,
            command.with_squires,
            clock.now(),
            &mut *rng_guard,
        )?
    };

    save_session(&mut session, clock, repo).await?;
    info!(
        %session_id,
        company = %session.company.name,
        members = session.company.members.len(),
        "new game started"
    );

    Ok(NewGameResult {
        session_id,
        narrative: opening_narrative(&session),
        game_state: GameStateView::from(&session),
        options: vec![
            "Explore the area".to_owned(),
            "Travel north".to_owned(),
            "Make camp".to_owned(),
        ],
    })
}

/// Resolves, narrates and persists one turn. The caller holds the lock.
#[instrument(skip_all, fields(session_id = %session.id, intent = %interpretation.intent))]
async fn play_turn(
    mut session: GameSession,
    player_input: &str,
    interpretation: Interpretation,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    repo: &dyn SessionRepository,
    narrator: &Narrator,
) -> Result<TurnResult, DomainError> {
    let outcome = {
        let mut rng_guard = rng
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
        apply_turn(&mut session, &interpretation, player_input, &mut *rng_guard)
    };

    let narrative = if outcome.narrate {
        narrator
            .narrate(&summarize(&session), player_input, &outcome.summary)
            .await
    } else {
        outcome.summary.clone()
    };

    session.record_turn(player_input, interpretation.intent.label(), &outcome.summary);
    save_session(&mut session, clock, repo).await?;
    info!(
        turn = session.turn_count,
        version = session.version,
        source = ?interpretation.source,
        "turn resolved"
    );

    Ok(TurnResult {
        session_id: session.id,
        narrative,
        game_state: GameStateView::from(&session),
        options: outcome.options,
        interpretation,
        outcome: outcome.event,
    })
}

/// Handles the `SubmitCommand` command: interprets free text with the model,
/// falling back to keywords, and plays the turn.
///
/// # Errors
///
/// Returns `DomainError::Validation` for blank or overlong input,
/// `DomainError::SessionNotFound` for unknown sessions,
/// `DomainError::ConcurrencyConflict` if another writer got there first, and
/// `DomainError::Infrastructure` if the RNG or the store fails. Model
/// failures are never returned.
pub async fn handle_submit_command(
    command: &SubmitCommand,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    repo: &dyn SessionRepository,
    narrator: &Narrator,
    locks: &SessionLocks,
) -> Result<TurnResult, DomainError> {
    let text = validate_input(&command.text)?;

    let _turn = locks.acquire(command.session_id).await?;
    let session = load_session(command.session_id, repo).await?;
    let interpretation = narrator.interpret(&summarize(&session), text).await;

    play_turn(session, text, interpretation, clock, rng, repo, narrator).await
}

/// Handles the `SubmitAction` command: plays a turn with the intent the
/// player chose, without asking the model to interpret it.
///
/// # Errors
///
/// Returns `DomainError::Validation` if there is nothing to act on, plus the
/// errors of [`handle_submit_command`].
pub async fn handle_submit_action(
    command: &SubmitAction,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    repo: &dyn SessionRepository,
    narrator: &Narrator,
    locks: &SessionLocks,
) -> Result<TurnResult, DomainError> {
    let text = match command.text.as_deref() {
        Some(text) if !text.trim().is_empty() => text.to_owned(),
        _ => command.intent.label().to_owned(),
    };
    let text = validate_input(&text)?;

    let _turn = locks.acquire(command.session_id).await?;
    let session = load_session(command.session_id, repo).await?;
    let interpretation = Interpretation::chosen(command.intent.clone(), command.risk.clone());

    play_turn(session, text, interpretation, clock, rng, repo, narrator).await
}

/// Handles the `StartCombat` command: opens an encounter as a combat turn.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an unknown enemy type or if the
/// company is already fighting, plus the errors of [`handle_submit_command`].
pub async fn handle_start_combat(
    command: &StartCombat,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    repo: &dyn SessionRepository,
    narrator: &Narrator,
    locks: &SessionLocks,
) -> Result<TurnResult, DomainError> {
    let kind = match command.enemy.as_deref().map(str::trim) {
        Some(enemy) if !enemy.is_empty() => enemy.parse::<EnemyKind>()?,
        _ => EnemyKind::Bandits,
    };

    let _turn = locks.acquire(command.session_id).await?;
    let session = load_session(command.session_id, repo).await?;
    if session.active_combat.is_some() {
        return Err(DomainError::Validation(
            "the company is already in combat".into(),
        ));
    }

    let input = format!("Engage the {kind}");
    let interpretation = Interpretation::chosen(Intent::Combat, None);
    play_turn(session, &input, interpretation, clock, rng, repo, narrator).await
}
