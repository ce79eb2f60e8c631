//! Encounters: enemy templates, initiative and exchanges of blows.

use std::fmt;
use std::str::FromStr;

use bastionlands_core::determinism::DeterministicRng;
use bastionlands_core::error::DomainError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::character::Character;
use super::dice::{attack_damage, attack_roll, scar_roll};
use super::resolution::absorb_damage;

/// The kinds of foe an encounter can be drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Bandits,
    Wolves,
}

impl EnemyKind {
    /// Picks the encounter type mentioned in free text. Anything that does
    /// not mention wolves is a band of brigands.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let lower = text.to_ascii_lowercase();
        if lower.contains("wolf") || lower.contains("wolves") {
            Self::Wolves
        } else {
            Self::Bandits
        }
    }
}

impl FromStr for EnemyKind {
    type Err = DomainError;

    /// Parses an explicit enemy type such as "wolves" or "Bandit".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bandit" | "bandits" | "brigand" | "brigands" => Ok(Self::Bandits),
            "wolf" | "wolves" => Ok(Self::Wolves),
            other => Err(DomainError::Validation(format!(
                "unknown enemy type: {other} (expected bandits or wolves)"
            ))),
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bandits => f.write_str("bandits"),
            Self::Wolves => f.write_str("wolves"),
        }
    }
}

/// A non-player combatant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Foe {
    pub name: String,
    pub vigour: u32,
    pub clarity: u32,
    pub guard: u32,
    pub armour: u32,
    pub attack_die: u32,
}

impl Foe {
    fn new(name: &str, vigour: u32, clarity: u32, guard: u32, armour: u32) -> Self {
        Self {
            name: name.to_owned(),
            vigour,
            clarity,
            guard,
            armour,
            attack_die: 6,
        }
    }

    /// Whether the foe is still fighting.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.vigour > 0
    }
}

/// Stat blocks for each encounter type.
#[must_use]
pub fn enemy_template(kind: EnemyKind) -> Vec<Foe> {
    match kind {
        EnemyKind::Bandits => vec![
            Foe::new("Bandit Leader", 8, 6, 4, 1),
            Foe::new("Bandit", 5, 5, 2, 0),
            Foe::new("Bandit", 5, 5, 2, 0),
        ],
        EnemyKind::Wolves => vec![
            Foe::new("Alpha Wolf", 7, 8, 0, 0),
            Foe::new("Wolf", 5, 6, 0, 0),
        ],
    }
}

/// An active fight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatState {
    pub enemy: EnemyKind,
    pub foes: Vec<Foe>,
    /// The next round to be fought, starting at 1.
    pub round: u32,
    /// Names in acting order: the company first, then the foes.
    pub initiative: Vec<String>,
}

impl CombatState {
    /// Foes still standing.
    pub fn living_foes(&self) -> impl Iterator<Item = &Foe> {
        self.foes.iter().filter(|foe| foe.is_alive())
    }
}

/// Starts an encounter against the given company members.
#[must_use]
pub fn start_combat(kind: EnemyKind, party: &[Character]) -> CombatState {
    let foes = enemy_template(kind);
    let initiative = party
        .iter()
        .filter(|member| member.is_alive())
        .map(|member| member.name.clone())
        .chain(foes.iter().map(|foe| foe.name.clone()))
        .collect();

    CombatState {
        enemy: kind,
        foes,
        round: 1,
        initiative,
    }
}

/// How the fight stands after an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatOutcome {
    Ongoing,
    Victory,
    Defeat,
}

/// Everything that happened in one exchange, in acting order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeReport {
    pub round: u32,
    pub events: Vec<String>,
    pub outcome: CombatOutcome,
}

/// Resolves one exchange: each living company member strikes the first
/// standing foe, then each standing foe strikes a random living member.
/// Members who are wounded but survive roll on the scar table.
pub fn resolve_exchange(
    state: &mut CombatState,
    party: &mut [Character],
    rng: &mut dyn DeterministicRng,
) -> ExchangeReport {
    let round = state.round;
    let mut events = Vec::new();

    for member in party.iter().filter(|member| member.is_alive()) {
        let Some(foe) = state.foes.iter_mut().find(|foe| foe.is_alive()) else {
            break;
        };
        let dice = attack_roll(rng, 1, member.weapon_die(), member.is_impaired());
        let damage = attack_damage(&dice, foe.armour);
        let report = absorb_damage(&mut foe.guard, &mut foe.vigour, damage);

        if foe.is_alive() {
            events.push(format!(
                "{} strikes {} for {} ({} through guard)",
                member.name, foe.name, damage, report.vigour_lost
            ));
        } else {
            events.push(format!("{} cuts down {}", member.name, foe.name));
        }
    }

    for foe in state.foes.iter().filter(|foe| foe.is_alive()) {
        let living: Vec<usize> = party
            .iter()
            .enumerate()
            .filter(|(_, member)| member.is_alive())
            .map(|(index, _)| index)
            .collect();
        if living.is_empty() {
            break;
        }

        #[allow(clippy::cast_possible_truncation)]
        let pick = rng.next_u32_range(0, (living.len() - 1) as u32) as usize;
        let target = &mut party[living[pick.min(living.len() - 1)]];

        let dice = attack_roll(rng, 1, foe.attack_die, false);
        let damage = attack_damage(&dice, target.armour());
        let report = target.apply_damage(damage);

        if !target.is_alive() {
            events.push(format!("{} slays {}", foe.name, target.name));
        } else if report.wounded() {
            let scar = scar_roll(rng);
            target.suffer_scar(scar);
            events.push(format!(
                "{} wounds {} for {}; {} suffers {}",
                foe.name, target.name, damage, target.name, scar
            ));
        } else {
            events.push(format!(
                "{} strikes {} for {}, turned by guard",
                foe.name, target.name, damage
            ));
        }
    }

    state.round += 1;

    let outcome = if state.living_foes().next().is_none() {
        CombatOutcome::Victory
    } else if party.iter().all(|member| !member.is_alive()) {
        CombatOutcome::Defeat
    } else {
        CombatOutcome::Ongoing
    };

    debug!(round, ?outcome, events = events.len(), "resolved exchange");

    ExchangeReport {
        round,
        events,
        outcome,
    }
}
