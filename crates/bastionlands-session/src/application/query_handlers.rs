//! Query handlers for the session context.
//!
//! Queries load the stored snapshot and return read-only view DTOs. They
//! never mutate or re-save the session.

use bastionlands_core::error::DomainError;
use bastionlands_core::repository::SessionRepository;
use bastionlands_rules::domain::character::{Character, Feat, Item, Role, Virtues};
use bastionlands_rules::domain::combat::{CombatState, EnemyKind};
use bastionlands_rules::domain::resolution::CharacterStatus;
use bastionlands_world::domain::hex::{Hex, HexCoord, Terrain};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::game_session::{GameSession, HistoryEntry};

/// A company member as shown in the game state.
#[derive(Debug, Serialize)]
pub struct MemberView {
    pub name: String,
    pub role: Role,
    pub vigour: u32,
    pub max_vigour: u32,
    pub clarity: u32,
    pub spirit: u32,
    pub guard: u32,
    pub max_guard: u32,
    pub wounds: usize,
    pub status: CharacterStatus,
}

impl From<&Character> for MemberView {
    fn from(member: &Character) -> Self {
        Self {
            name: member.name.clone(),
            role: member.role,
            vigour: member.virtues.vigour,
            max_vigour: member.max_virtues.vigour,
            clarity: member.virtues.clarity,
            spirit: member.virtues.spirit,
            guard: member.guard,
            max_guard: member.max_guard,
            wounds: member.wounds.len(),
            status: member.status(),
        }
    }
}

/// Where the company stands. Landmarks show only once the hex is explored.
#[derive(Debug, Serialize)]
pub struct LocationView {
    pub coord: HexCoord,
    pub terrain: Option<Terrain>,
    pub landmark: Option<String>,
    pub explored: bool,
    pub river: bool,
}

/// A known hex on the company's map. Landmarks show only once explored.
#[derive(Debug, Serialize)]
pub struct HexView {
    pub coord: HexCoord,
    pub terrain: Terrain,
    pub explored: bool,
    pub river: bool,
    pub landmark: Option<String>,
}

impl From<&Hex> for HexView {
    fn from(hex: &Hex) -> Self {
        Self {
            coord: hex.coord,
            terrain: hex.terrain,
            explored: hex.explored,
            river: hex.river,
            landmark: hex.landmark.clone().filter(|_| hex.explored),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FoeView {
    pub name: String,
    pub vigour: u32,
    pub guard: u32,
    pub alive: bool,
}

#[derive(Debug, Serialize)]
pub struct CombatView {
    pub enemy: EnemyKind,
    pub round: u32,
    pub initiative: Vec<String>,
    pub foes: Vec<FoeView>,
}

impl From<&CombatState> for CombatView {
    fn from(combat: &CombatState) -> Self {
        Self {
            enemy: combat.enemy,
            round: combat.round,
            initiative: combat.initiative.clone(),
            foes: combat
                .foes
                .iter()
                .map(|foe| FoeView {
                    name: foe.name.clone(),
                    vigour: foe.vigour,
                    guard: foe.guard,
                    alive: foe.is_alive(),
                })
                .collect(),
        }
    }
}

/// Read-only snapshot of a game session.
#[derive(Debug, Serialize)]
pub struct GameStateView {
    pub session_id: Uuid,
    pub company: String,
    pub turn: u64,
    pub day: u32,
    pub moves_remaining: u32,
    pub location: LocationView,
    pub members: Vec<MemberView>,
    pub combat: Option<CombatView>,
    pub hexes_known: usize,
    pub hexes_explored: usize,
    /// Every known hex, in coordinate order.
    pub hexes: Vec<HexView>,
    pub history: Vec<HistoryEntry>,
    /// Stored version the view was read at.
    pub version: i64,
}

impl From<&GameSession> for GameStateView {
    fn from(session: &GameSession) -> Self {
        let hex = session.current_hex();
        Self {
            session_id: session.id,
            company: session.company.name.clone(),
            turn: session.turn_count,
            day: session.day,
            moves_remaining: session.moves_remaining,
            location: LocationView {
                coord: session.position,
                terrain: hex.map(|hex| hex.terrain),
                landmark: hex
                    .filter(|hex| hex.explored)
                    .and_then(|hex| hex.landmark.clone()),
                explored: hex.is_some_and(|hex| hex.explored),
                river: hex.is_some_and(|hex| hex.river),
            },
            members: session.company.members.iter().map(MemberView::from).collect(),
            combat: session.active_combat.as_ref().map(CombatView::from),
            hexes_known: session.world.len(),
            hexes_explored: session.world.explored_count(),
            hexes: session.world.iter().map(HexView::from).collect(),
            history: session.history.clone(),
            version: session.version,
        }
    }
}

/// Zero-score flags for a character.
#[derive(Debug, Serialize)]
pub struct ConditionsView {
    /// Vigour at zero.
    pub exhausted: bool,
    /// Clarity at zero.
    pub exposed: bool,
    /// Spirit at zero.
    pub impaired: bool,
}

/// Full detail for one company member.
#[derive(Debug, Serialize)]
pub struct CharacterView {
    pub name: String,
    pub role: Role,
    pub virtues: Virtues,
    pub max_virtues: Virtues,
    pub guard: u32,
    pub max_guard: u32,
    pub armour: u32,
    pub equipment: Vec<Item>,
    pub wounds: Vec<String>,
    pub status: CharacterStatus,
    pub conditions: ConditionsView,
    pub feats: Vec<Feat>,
    pub oath: Vec<String>,
    pub has_squire: bool,
}

impl From<&Character> for CharacterView {
    fn from(character: &Character) -> Self {
        let traits = character.knight.as_ref();
        Self {
            name: character.name.clone(),
            role: character.role,
            virtues: character.virtues,
            max_virtues: character.max_virtues,
            guard: character.guard,
            max_guard: character.max_guard,
            armour: character.armour(),
            equipment: character.equipment.clone(),
            wounds: character.wounds.clone(),
            status: character.status(),
            conditions: ConditionsView {
                exhausted: character.virtues.vigour == 0,
                exposed: character.virtues.clarity == 0,
                impaired: character.is_impaired(),
            },
            feats: traits.map(|traits| traits.feats.clone()).unwrap_or_default(),
            oath: traits.map(|traits| traits.oath.clone()).unwrap_or_default(),
            has_squire: traits.is_some_and(|traits| traits.has_squire),
        }
    }
}

/// One row of the session listing.
#[derive(Debug, Serialize)]
pub struct SessionSummaryView {
    pub session_id: Uuid,
    pub company: String,
    pub turn: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SessionListView {
    pub active_sessions: usize,
    pub sessions: Vec<SessionSummaryView>,
}

/// Loads and rebuilds a session.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` for unknown ids and
/// `DomainError::Infrastructure` if loading or deserialization fails.
pub(crate) async fn load_session(
    session_id: Uuid,
    repo: &dyn SessionRepository,
) -> Result<GameSession, DomainError> {
    let stored = repo
        .get(session_id)
        .await?
        .ok_or(DomainError::SessionNotFound(session_id))?;
    GameSession::from_stored(&stored)
}

/// Retrieves the current game state.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` for unknown ids and
/// `DomainError::Infrastructure` if loading fails.
pub async fn get_game_state(
    session_id: Uuid,
    repo: &dyn SessionRepository,
) -> Result<GameStateView, DomainError> {
    let session = load_session(session_id, repo).await?;
    Ok(GameStateView::from(&session))
}

/// Retrieves one company member by name, ignoring case.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` for unknown sessions,
/// `DomainError::CharacterNotFound` for unknown names and
/// `DomainError::Infrastructure` if loading fails.
pub async fn get_character(
    session_id: Uuid,
    name: &str,
    repo: &dyn SessionRepository,
) -> Result<CharacterView, DomainError> {
    let session = load_session(session_id, repo).await?;
    session
        .company
        .find(name)
        .map(CharacterView::from)
        .ok_or_else(|| DomainError::CharacterNotFound {
            session_id,
            name: name.to_owned(),
        })
}

/// Lists stored sessions, most recently played first.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store fails.
pub async fn list_sessions(repo: &dyn SessionRepository) -> Result<SessionListView, DomainError> {
    let sessions: Vec<SessionSummaryView> = repo
        .list()
        .await?
        .into_iter()
        .map(|stored| SessionSummaryView {
            session_id: stored.session_id,
            company: stored.company_name,
            turn: stored.turn_count,
            updated_at: stored.updated_at,
        })
        .collect();
    Ok(SessionListView {
        active_sessions: sessions.len(),
        sessions,
    })
}
