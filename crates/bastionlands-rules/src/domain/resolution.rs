//! Virtue saves, damage application and status classification.

use std::fmt;

use bastionlands_core::determinism::DeterministicRng;
use serde::{Deserialize, Serialize};

use super::character::{Character, Virtue};
use super::dice::{Scar, d20};

/// Result of a virtue save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResult {
    pub virtue: Virtue,
    pub success: bool,
    /// The raw d20.
    pub roll: u32,
    /// The value the roll was compared against.
    pub target: u32,
}

/// Rolls a d20 save. Succeeds when the roll is at or under the explicit
/// `difficulty`, or under the character's current virtue score when no
/// difficulty is given.
pub fn make_save(
    character: &Character,
    virtue: Virtue,
    difficulty: Option<u32>,
    rng: &mut dyn DeterministicRng,
) -> SaveResult {
    let roll = d20(rng);
    let target = difficulty.unwrap_or_else(|| character.virtues.get(virtue));
    SaveResult {
        virtue,
        success: roll <= target,
        roll,
        target,
    }
}

/// What a single hit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageReport {
    pub incoming: u32,
    /// Damage soaked by guard.
    pub guard_lost: u32,
    /// Damage that reached vigour.
    pub vigour_lost: u32,
    /// Damage beyond what was needed to bring vigour to zero.
    pub overkill: u32,
}

impl DamageReport {
    /// Whether the hit got past guard.
    #[must_use]
    pub fn wounded(&self) -> bool {
        self.vigour_lost > 0
    }
}

/// Applies damage to a guard/vigour pair. Guard absorbs first; vigour takes
/// the remainder and stops at zero, with the excess reported as overkill.
pub fn absorb_damage(guard: &mut u32, vigour: &mut u32, amount: u32) -> DamageReport {
    let guard_lost = amount.min(*guard);
    *guard -= guard_lost;

    let remainder = amount - guard_lost;
    let vigour_lost = remainder.min(*vigour);
    *vigour -= vigour_lost;

    DamageReport {
        incoming: amount,
        guard_lost,
        vigour_lost,
        overkill: remainder - vigour_lost,
    }
}

impl Character {
    /// Applies incoming damage to this character.
    pub fn apply_damage(&mut self, amount: u32) -> DamageReport {
        absorb_damage(&mut self.guard, &mut self.virtues.vigour, amount)
    }

    /// Records a scar and applies its lasting effect: a virtue it names
    /// loses a point of its maximum and current score. A scar never kills,
    /// so vigour stays at one or more.
    pub fn suffer_scar(&mut self, scar: Scar) {
        self.wounds.push(format!("{scar}: {}", scar.effect()));
        let Some(virtue) = scar.virtue_loss() else {
            return;
        };
        let (max, current) = match virtue {
            Virtue::Vigour => (&mut self.max_virtues.vigour, &mut self.virtues.vigour),
            Virtue::Clarity => (&mut self.max_virtues.clarity, &mut self.virtues.clarity),
            Virtue::Spirit => (&mut self.max_virtues.spirit, &mut self.virtues.spirit),
        };
        *max = max.saturating_sub(1).max(1);
        let floor = u32::from(virtue == Virtue::Vigour && *current > 0);
        *current = current.saturating_sub(1).max(floor).min(*max);
    }

    /// Restores guard to its maximum.
    pub fn restore_guard(&mut self) {
        self.guard = self.max_guard;
    }

    /// Current status, derived fresh from guard and vigour.
    #[must_use]
    pub fn status(&self) -> CharacterStatus {
        classify(self.guard, self.virtues.vigour, self.max_virtues.vigour)
    }
}

/// Condition label derived from current guard and vigour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterStatus {
    #[serde(rename = "Slain")]
    Slain,
    #[serde(rename = "Mortally Wounded")]
    MortallyWounded,
    #[serde(rename = "Exposed")]
    Exposed,
    #[serde(rename = "Healthy")]
    Healthy,
}

impl fmt::Display for CharacterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Slain => "Slain",
            Self::MortallyWounded => "Mortally Wounded",
            Self::Exposed => "Exposed",
            Self::Healthy => "Healthy",
        };
        f.write_str(label)
    }
}

/// Classifies a guard/vigour pair. Mortal wounds are measured against the
/// rolled maximum vigour.
#[must_use]
pub fn classify(guard: u32, vigour: u32, max_vigour: u32) -> CharacterStatus {
    if vigour == 0 {
        CharacterStatus::Slain
    } else if vigour.saturating_mul(2) <= max_vigour {
        CharacterStatus::MortallyWounded
    } else if guard == 0 {
        CharacterStatus::Exposed
    } else {
        CharacterStatus::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::character::generate_knight;
    use bastionlands_test_support::SequenceRng;

    /// Knight with vigour 10 (5+5), clarity 8, spirit 6, guard 3.
    fn knight() -> Character {
        let mut rng = SequenceRng::new(vec![5, 5, 4, 4, 3, 3, 3, 2]);
        generate_knight("Ser Test", false, &mut rng)
    }

    #[test]
    fn test_save_fails_when_roll_exceeds_virtue() {
        let mut character = knight();
        character.virtues.clarity = 15;
        let mut rng = SequenceRng::new(vec![17]);

        let result = make_save(&character, Virtue::Clarity, None, &mut rng);

        assert!(!result.success);
        assert_eq!(result.roll, 17);
        assert_eq!(result.target, 15);
    }

    #[test]
    fn test_save_succeeds_on_equal_roll() {
        let mut character = knight();
        character.virtues.clarity = 15;
        let mut rng = SequenceRng::new(vec![15]);

        let result = make_save(&character, Virtue::Clarity, None, &mut rng);

        assert!(result.success);
    }

    #[test]
    fn test_save_uses_explicit_difficulty() {
        let character = knight();
        let mut rng = SequenceRng::new(vec![12]);

        let result = make_save(&character, Virtue::Vigour, Some(11), &mut rng);

        assert!(!result.success);
        assert_eq!(result.target, 11);
    }

    #[test]
    fn test_damage_spills_from_guard_into_vigour() {
        let mut character = knight();
        assert_eq!((character.guard, character.virtues.vigour), (3, 10));

        let report = character.apply_damage(5);

        assert_eq!(character.guard, 0);
        assert_eq!(character.virtues.vigour, 8);
        assert_eq!(report.guard_lost, 3);
        assert_eq!(report.vigour_lost, 2);
        assert!(report.wounded());
    }

    #[test]
    fn test_damage_within_guard_leaves_vigour() {
        let mut character = knight();

        let report = character.apply_damage(2);

        assert_eq!(character.guard, 1);
        assert_eq!(character.virtues.vigour, 10);
        assert!(!report.wounded());
    }

    #[test]
    fn test_vigour_clamps_at_zero_and_reports_overkill() {
        let mut character = knight();

        let report = character.apply_damage(20);

        assert_eq!(character.virtues.vigour, 0);
        assert_eq!(report.overkill, 7);
        assert_eq!(character.status(), CharacterStatus::Slain);
    }

    #[test]
    fn test_zero_vigour_is_slain_regardless_of_guard() {
        assert_eq!(classify(12, 0, 10), CharacterStatus::Slain);
    }

    #[test]
    fn test_half_max_vigour_is_mortally_wounded() {
        assert_eq!(classify(4, 5, 10), CharacterStatus::MortallyWounded);
        assert_eq!(classify(4, 6, 10), CharacterStatus::Healthy);
    }

    #[test]
    fn test_zero_guard_is_exposed() {
        assert_eq!(classify(0, 8, 10), CharacterStatus::Exposed);
    }

    #[test]
    fn test_restore_guard_returns_to_max() {
        let mut character = knight();
        character.apply_damage(3);

        character.restore_guard();

        assert_eq!(character.guard, 3);
        assert_eq!(character.status(), CharacterStatus::Healthy);
    }

    #[test]
    fn test_scar_lowers_the_virtue_it_names() {
        let mut character = knight();

        character.suffer_scar(Scar::Concussion);

        assert_eq!(character.max_virtues.clarity, 7);
        assert_eq!(character.virtues.clarity, 7);
        assert_eq!(character.virtues.vigour, 10);
        assert_eq!(character.wounds, vec!["Concussion: the mind reels from the blow"]);
    }

    #[test]
    fn test_scar_without_virtue_loss_is_only_recorded() {
        let mut character = knight();
        let before = character.virtues;

        character.suffer_scar(Scar::Disfigurement);

        assert_eq!(character.virtues, before);
        assert_eq!(character.wounds.len(), 1);
    }

    #[test]
    fn test_vigour_scar_never_kills() {
        let mut character = knight();
        character.virtues.vigour = 1;

        character.suffer_scar(Scar::Smash);

        assert_eq!(character.max_virtues.vigour, 9);
        assert_eq!(character.virtues.vigour, 1);
        assert!(character.is_alive());
    }

    #[test]
    fn test_status_serializes_as_label() {
        let json = serde_json::to_value(CharacterStatus::MortallyWounded).unwrap();
        assert_eq!(json, "Mortally Wounded");
    }
}
