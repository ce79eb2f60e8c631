//! The game session snapshot and the company it follows.

use bastionlands_core::determinism::DeterministicRng;
use bastionlands_core::error::DomainError;
use bastionlands_core::repository::StoredSession;
use bastionlands_rules::domain::character::{Character, Role, generate_knight, generate_squire};
use bastionlands_rules::domain::combat::CombatState;
use bastionlands_world::domain::hex::{Hex, HexCoord};
use bastionlands_world::domain::map::WorldMap;
use bastionlands_world::domain::travel::MOVES_PER_DAY;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Most Knights a company may field.
pub const MAX_KNIGHTS: usize = 3;

/// Turns kept in the session history.
pub const MAX_HISTORY: usize = 10;

/// Longest accepted company or character name, in characters.
pub const MAX_NAME_LEN: usize = 50;

/// A band of Knights and their Squires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    /// Knights in company order, followed by Squires.
    pub members: Vec<Character>,
}

impl Company {
    pub fn knights(&self) -> impl Iterator<Item = &Character> {
        self.members
            .iter()
            .filter(|member| member.role == Role::Knight)
    }

    pub fn squires(&self) -> impl Iterator<Item = &Character> {
        self.members
            .iter()
            .filter(|member| member.role == Role::Squire)
    }

    /// Members still standing.
    #[must_use]
    pub fn size(&self) -> usize {
        self.members.iter().filter(|member| member.is_alive()).count()
    }

    /// Finds a member by name, ignoring case.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Character> {
        let wanted = name.trim();
        self.members
            .iter()
            .find(|member| member.name.eq_ignore_ascii_case(wanted))
    }

    /// The first Knight still standing.
    pub fn lead_knight_mut(&mut self) -> Option<&mut Character> {
        self.members
            .iter_mut()
            .find(|member| member.role == Role::Knight && member.is_alive())
    }
}

/// One resolved turn, as remembered by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub turn: u64,
    pub input: String,
    pub intent: String,
    /// What the rules decided, before narration.
    pub summary: String,
}

/// A game in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    pub id: Uuid,
    pub company: Company,
    pub position: HexCoord,
    pub turn_count: u64,
    pub day: u32,
    pub moves_remaining: u32,
    pub world: WorldMap,
    pub active_combat: Option<CombatState>,
    /// Most recent turns, oldest first.
    pub history: Vec<HistoryEntry>,
    /// Stored version this snapshot was loaded at; 0 until first saved.
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

fn validate_name(kind: &str, name: &str) -> Result<String, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{kind} name must not be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::Validation(format!(
            "{kind} name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_owned())
}

impl GameSession {
    /// Rolls a new company and the hexes around its starting point.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the company name is blank or too
    /// long, if there are not between 1 and 3 Knights, or if a Knight's name
    /// is blank, too long or repeated.
    pub fn new_game(
        id: Uuid,
        company_name: &str,
        knight_names: &[String],
        with_squires: bool,
        now: DateTime<Utc>,
        rng: &mut dyn DeterministicRng,
    ) -> Result<Self, DomainError> {
        let company_name = validate_name("company", company_name)?;

        if knight_names.is_empty() || knight_names.len() > MAX_KNIGHTS {
            return Err(DomainError::Validation(format!(
                "a company needs between 1 and {MAX_KNIGHTS} knights, got {}",
                knight_names.len()
            )));
        }

        let mut names: Vec<String> = Vec::with_capacity(knight_names.len());
        for name in knight_names {
            let name = validate_name("knight", name)?;
            if names.iter().any(|seen| seen.eq_ignore_ascii_case(&name)) {
                return Err(DomainError::Validation(format!(
                    "knight names must be unique: {name}"
                )));
            }
            names.push(name);
        }

        let mut members: Vec<Character> = names
            .iter()
            .map(|name| generate_knight(name, with_squires, rng))
            .collect();
        if with_squires {
            for name in &names {
                members.push(generate_squire(&format!("Squire of {name}"), rng));
            }
        }

        let world = WorldMap::initialize(rng);

        Ok(Self {
            id,
            company: Company {
                name: company_name,
                members,
            },
            position: HexCoord::ORIGIN,
            turn_count: 0,
            day: 1,
            moves_remaining: MOVES_PER_DAY,
            world,
            active_combat: None,
            history: Vec::new(),
            version: 0,
            created_at: now,
        })
    }

    /// The hex the company stands in.
    #[must_use]
    pub fn current_hex(&self) -> Option<&Hex> {
        self.world.get(self.position)
    }

    /// Counts a resolved turn and remembers it, forgetting the oldest
    /// entries past `MAX_HISTORY`.
    pub fn record_turn(&mut self, input: &str, intent: &str, summary: &str) {
        self.turn_count += 1;
        self.history.push(HistoryEntry {
            turn: self.turn_count,
            input: input.to_owned(),
            intent: intent.to_owned(),
            summary: summary.to_owned(),
        });
        if self.history.len() > MAX_HISTORY {
            let excess = self.history.len() - MAX_HISTORY;
            self.history.drain(..excess);
        }
    }

    /// Serializes the session for the store.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if serialization fails and
    /// `DomainError::InvariantViolation` if the turn counter overflows the
    /// stored column.
    pub fn to_stored(&self, updated_at: DateTime<Utc>) -> Result<StoredSession, DomainError> {
        let payload = serde_json::to_value(self).map_err(|e| {
            DomainError::Infrastructure(format!("session serialization failed: {e}"))
        })?;
        let turn_count = i64::try_from(self.turn_count).map_err(|_| {
            DomainError::InvariantViolation(format!(
                "turn counter {} does not fit the store",
                self.turn_count
            ))
        })?;

        Ok(StoredSession {
            session_id: self.id,
            company_name: self.company.name.clone(),
            turn_count,
            version: self.version,
            payload,
            updated_at,
        })
    }

    /// Rebuilds a session from a stored snapshot. The stored version wins
    /// over whatever the payload recorded.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the payload does not
    /// deserialize.
    pub fn from_stored(stored: &StoredSession) -> Result<Self, DomainError> {
        let mut session: Self = serde_json::from_value(stored.payload.clone()).map_err(|e| {
            DomainError::Infrastructure(format!("session deserialization failed: {e}"))
        })?;
        session.version = stored.version;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastionlands_core::determinism::SeededRng;
    use bastionlands_test_support::FixedClock;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|name| (*name).to_owned()).collect()
    }

    fn new_game(knights: &[&str], with_squires: bool) -> Result<GameSession, DomainError> {
        let mut rng = SeededRng::from_seed(42);
        GameSession::new_game(
            Uuid::new_v4(),
            "The Ashen Oath",
            &names(knights),
            with_squires,
            FixedClock::new_year().0,
            &mut rng,
        )
    }

    #[test]
    fn test_new_game_starts_at_origin_on_day_one() {
        // Act
        let session = new_game(&["Ser Aldric", "Ser Bryn"], false).unwrap();

        // Assert
        assert_eq!(session.position, HexCoord::ORIGIN);
        assert_eq!(session.day, 1);
        assert_eq!(session.moves_remaining, MOVES_PER_DAY);
        assert_eq!(session.turn_count, 0);
        assert_eq!(session.version, 0);
        assert_eq!(session.company.knights().count(), 2);
        assert_eq!(session.company.squires().count(), 0);
        assert_eq!(session.world.len(), 7);
        assert!(session.active_combat.is_none());
    }

    #[test]
    fn test_new_game_assigns_one_squire_per_knight() {
        let session = new_game(&["Ser Aldric", "Ser Bryn"], true).unwrap();

        let squires: Vec<&str> = session
            .company
            .squires()
            .map(|squire| squire.name.as_str())
            .collect();
        assert_eq!(squires, vec!["Squire of Ser Aldric", "Squire of Ser Bryn"]);
        assert!(
            session
                .company
                .knights()
                .all(|knight| knight.knight.as_ref().is_some_and(|traits| traits.has_squire))
        );
    }

    #[test]
    fn test_new_game_rejects_bad_knight_counts() {
        assert!(matches!(new_game(&[], false), Err(DomainError::Validation(_))));
        assert!(matches!(
            new_game(&["A", "B", "C", "D"], false),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_new_game_rejects_blank_and_duplicate_names() {
        assert!(matches!(new_game(&["  "], false), Err(DomainError::Validation(_))));
        assert!(matches!(
            new_game(&["Ser Aldric", "ser aldric"], false),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_history_keeps_only_recent_turns() {
        let mut session = new_game(&["Ser Aldric"], false).unwrap();

        for turn in 0..15 {
            session.record_turn(&format!("input {turn}"), "explore", "searched");
        }

        assert_eq!(session.turn_count, 15);
        assert_eq!(session.history.len(), MAX_HISTORY);
        assert_eq!(session.history[0].turn, 6);
        assert_eq!(session.history[MAX_HISTORY - 1].input, "input 14");
    }

    #[test]
    fn test_snapshot_survives_the_store() {
        let mut session = new_game(&["Ser Aldric"], true).unwrap();
        session.record_turn("look around", "explore", "searched");
        session.version = 3;

        let stored = session.to_stored(FixedClock::new_year().0).unwrap();
        let restored = GameSession::from_stored(&stored).unwrap();

        assert_eq!(stored.turn_count, 1);
        assert_eq!(stored.company_name, "The Ashen Oath");
        assert_eq!(restored, session);
    }

    #[test]
    fn test_corrupt_snapshot_is_an_infrastructure_error() {
        let session = new_game(&["Ser Aldric"], false).unwrap();
        let mut stored = session.to_stored(FixedClock::new_year().0).unwrap();
        stored.payload = serde_json::json!({"id": "not a session"});

        assert!(matches!(
            GameSession::from_stored(&stored),
            Err(DomainError::Infrastructure(_))
        ));
    }

    #[test]
    fn test_find_member_ignores_case() {
        let session = new_game(&["Ser Aldric"], true).unwrap();

        assert!(session.company.find("SER ALDRIC").is_some());
        assert!(session.company.find("squire of ser aldric").is_some());
        assert!(session.company.find("Ser Nobody").is_none());
    }
}
