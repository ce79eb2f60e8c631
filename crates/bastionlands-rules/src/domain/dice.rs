//! Dice primitives: plain rolls, luck rolls, scars and attack dice.

use std::fmt;

use bastionlands_core::determinism::DeterministicRng;
use serde::{Deserialize, Serialize};

use super::character::Virtue;

/// Roll a single d6.
pub fn d6(rng: &mut dyn DeterministicRng) -> u32 {
    rng.roll(6)
}

/// Roll a single d20.
pub fn d20(rng: &mut dyn DeterministicRng) -> u32 {
    rng.roll(20)
}

/// Roll `count` dice of the same size.
pub fn roll_many(rng: &mut dyn DeterministicRng, count: u32, sides: u32) -> Vec<u32> {
    (0..count).map(|_| rng.roll(sides)).collect()
}

/// Result category of a luck roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LuckOutcome {
    /// Rolled 1: something immediately bad.
    Crisis,
    /// Rolled 2-3: something potentially bad.
    Problem,
    /// Rolled 4-6: a welcome result.
    Blessing,
}

impl fmt::Display for LuckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Crisis => "crisis",
            Self::Problem => "problem",
            Self::Blessing => "blessing",
        };
        f.write_str(label)
    }
}

/// A luck roll together with the die that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuckRoll {
    /// The raw d6.
    pub roll: u32,
    /// The outcome band.
    pub outcome: LuckOutcome,
}

/// Roll a d6 on the luck table.
pub fn luck_roll(rng: &mut dyn DeterministicRng) -> LuckRoll {
    let roll = d6(rng);
    let outcome = match roll {
        1 => LuckOutcome::Crisis,
        2 | 3 => LuckOutcome::Problem,
        _ => LuckOutcome::Blessing,
    };
    LuckRoll { roll, outcome }
}

/// Lasting injuries from the 2d6 scar table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scar {
    Distress,
    Disfigurement,
    Smash,
    Stun,
    Rupture,
    Gouge,
    Concussion,
    Tear,
    Agony,
    Mutilation,
    Doom,
}

impl Scar {
    /// Maps a 2d6 total onto the table. Totals outside 2..=12 are clamped.
    #[must_use]
    pub fn from_total(total: u32) -> Self {
        match total.clamp(2, 12) {
            2 => Self::Distress,
            3 => Self::Disfigurement,
            4 => Self::Smash,
            5 => Self::Stun,
            6 => Self::Rupture,
            7 => Self::Gouge,
            8 => Self::Concussion,
            9 => Self::Tear,
            10 => Self::Agony,
            11 => Self::Mutilation,
            _ => Self::Doom,
        }
    }

    /// Short description of the lasting effect.
    #[must_use]
    pub fn effect(self) -> &'static str {
        match self {
            Self::Distress => "a lucky escape, shaken but whole",
            Self::Disfigurement => "a permanent mark upon the face",
            Self::Smash => "bones cracked, vigour sapped",
            Self::Stun => "pain drowns the senses",
            Self::Rupture => "something inside has burst",
            Self::Gouge => "flesh torn from bone",
            Self::Concussion => "the mind reels from the blow",
            Self::Tear => "a piece of the body is lost",
            Self::Agony => "the spirit buckles under pain",
            Self::Mutilation => "a limb is ruined",
            Self::Doom => "death haunts you",
        }
    }
}

impl Scar {
    /// The virtue this scar lowers for good, if any. The table's guard loss
    /// has nothing left to take: scars are only rolled once guard is gone.
    #[must_use]
    pub fn virtue_loss(self) -> Option<Virtue> {
        match self {
            Self::Smash | Self::Rupture => Some(Virtue::Vigour),
            Self::Concussion => Some(Virtue::Clarity),
            Self::Agony => Some(Virtue::Spirit),
            _ => None,
        }
    }
}

impl fmt::Display for Scar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Distress => "Distress",
            Self::Disfigurement => "Disfigurement",
            Self::Smash => "Smash",
            Self::Stun => "Stun",
            Self::Rupture => "Rupture",
            Self::Gouge => "Gouge",
            Self::Concussion => "Concussion",
            Self::Tear => "Tear",
            Self::Agony => "Agony",
            Self::Mutilation => "Mutilation",
            Self::Doom => "Doom",
        };
        f.write_str(label)
    }
}

/// Roll 2d6 on the scar table.
pub fn scar_roll(rng: &mut dyn DeterministicRng) -> Scar {
    let total = d6(rng) + d6(rng);
    Scar::from_total(total)
}

/// Roll attack dice. Impaired attackers roll d4s instead of the weapon die.
pub fn attack_roll(
    rng: &mut dyn DeterministicRng,
    dice_count: u32,
    weapon_die: u32,
    impaired: bool,
) -> Vec<u32> {
    let sides = if impaired { 4 } else { weapon_die };
    roll_many(rng, dice_count, sides)
}

/// Damage dealt by an attack: the highest die minus armour, never negative.
#[must_use]
pub fn attack_damage(dice: &[u32], armour: u32) -> u32 {
    dice.iter()
        .copied()
        .max()
        .map_or(0, |highest| highest.saturating_sub(armour))
}
