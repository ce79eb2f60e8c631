//! Knights, Squires and the tables they are rolled from.

use std::fmt;
use std::str::FromStr;

use bastionlands_core::determinism::DeterministicRng;
use bastionlands_core::error::DomainError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::dice::d6;

/// The three tenets every Knight swears.
pub const KNIGHTLY_OATH: [&str; 3] = ["Seek the Myths", "Honour the Seers", "Protect the Realm"];

/// Character role, which selects the generation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Knight,
    Squire,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Knight => f.write_str("Knight"),
            Self::Squire => f.write_str("Squire"),
        }
    }
}

/// One of the three core stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Virtue {
    /// Physical capability.
    Vigour,
    /// Mental capability.
    Clarity,
    /// Social capability and will.
    Spirit,
}

impl fmt::Display for Virtue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vigour => f.write_str("Vigour"),
            Self::Clarity => f.write_str("Clarity"),
            Self::Spirit => f.write_str("Spirit"),
        }
    }
}

impl FromStr for Virtue {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vigour" | "vigor" | "vig" => Ok(Self::Vigour),
            "clarity" | "cla" => Ok(Self::Clarity),
            "spirit" | "spi" => Ok(Self::Spirit),
            other => Err(DomainError::Validation(format!("unknown virtue: {other}"))),
        }
    }
}

/// Scores for the three virtues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Virtues {
    pub vigour: u32,
    pub clarity: u32,
    pub spirit: u32,
}

impl Virtues {
    /// Returns the score for a single virtue.
    #[must_use]
    pub fn get(&self, virtue: Virtue) -> u32 {
        match virtue {
            Virtue::Vigour => self.vigour,
            Virtue::Clarity => self.clarity,
            Virtue::Spirit => self.spirit,
        }
    }
}

/// What an item does when it matters mechanically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    /// Deals damage with a die of the given size.
    Weapon { damage_die: u32 },
    /// Reduces incoming damage.
    Armour { value: u32 },
    /// Everything else.
    Gear,
}

/// An equipment entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl Item {
    fn weapon(name: &str, damage_die: u32) -> Self {
        Self {
            name: name.to_owned(),
            kind: ItemKind::Weapon { damage_die },
        }
    }

    fn armour(name: &str, value: u32) -> Self {
        Self {
            name: name.to_owned(),
            kind: ItemKind::Armour { value },
        }
    }

    fn gear(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            kind: ItemKind::Gear,
        }
    }
}

/// Knightly feats, usable once per attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feat {
    /// Add a d12 to the attack, or make it a blast.
    Smite,
    /// Perform a gambit without spending a die.
    Focus,
    /// Rebuff an incoming attack.
    Deny,
}

/// Fields only Knights carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnightTraits {
    pub feats: Vec<Feat>,
    pub oath: Vec<String>,
    pub has_squire: bool,
}

/// A Knight or Squire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub role: Role,
    pub virtues: Virtues,
    /// Virtue scores as rolled; the baseline for wound severity.
    pub max_virtues: Virtues,
    pub guard: u32,
    pub max_guard: u32,
    pub equipment: Vec<Item>,
    /// Scars and lasting injuries, in the order they were suffered.
    pub wounds: Vec<String>,
    pub knight: Option<KnightTraits>,
}

impl Character {
    /// Total armour from worn equipment.
    #[must_use]
    pub fn armour(&self) -> u32 {
        self.equipment
            .iter()
            .map(|item| match item.kind {
                ItemKind::Armour { value } => value,
                _ => 0,
            })
            .sum()
    }

    /// Largest weapon die carried; bare hands strike with a d4.
    #[must_use]
    pub fn weapon_die(&self) -> u32 {
        self.equipment
            .iter()
            .filter_map(|item| match item.kind {
                ItemKind::Weapon { damage_die } => Some(damage_die),
                _ => None,
            })
            .max()
            .unwrap_or(4)
    }

    /// Spirit at zero: attacks roll d4s only.
    #[must_use]
    pub fn is_impaired(&self) -> bool {
        self.virtues.spirit == 0
    }

    /// Whether the character can still act.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.virtues.vigour > 0
    }
}

/// The kit every Knight starts with before the virtue item.
#[must_use]
pub fn knight_base_equipment() -> Vec<Item> {
    vec![
        Item::weapon("Sword", 8),
        Item::weapon("Dagger", 6),
        Item::armour("Gambeson", 1),
        Item::gear("Rations"),
        Item::gear("Bedroll"),
    ]
}

/// The kit every Squire carries.
#[must_use]
pub fn squire_equipment() -> Vec<Item> {
    vec![
        Item::weapon("Dagger", 6),
        Item::gear("Torches"),
        Item::gear("Rope"),
    ]
}

/// Looks up the d6 virtue-item table. Rolls outside 1..=6 are a programming
/// error upstream and are clamped.
#[must_use]
pub fn virtue_item(roll: u32) -> Item {
    match roll.clamp(1, 6) {
        1 => Item::weapon("Cudgel", 6),
        2 => Item::weapon("Longbow", 8),
        3 => Item::weapon("Spear", 8),
        4 => Item::gear("Lantern"),
        5 => Item::armour("Shield", 1),
        _ => Item::gear("Warhorse"),
    }
}

fn roll_virtue(rng: &mut dyn DeterministicRng, dice: u32) -> u32 {
    (0..dice).map(|_| d6(rng)).sum()
}

/// Rolls a new Knight: 2d6 per virtue, d12 guard, base kit plus one virtue
/// item from the d6 table.
pub fn generate_knight(name: &str, has_squire: bool, rng: &mut dyn DeterministicRng) -> Character {
    let virtues = Virtues {
        vigour: roll_virtue(rng, 2),
        clarity: roll_virtue(rng, 2),
        spirit: roll_virtue(rng, 2),
    };
    let guard = rng.roll(12);
    let item_roll = d6(rng);

    let mut equipment = knight_base_equipment();
    equipment.push(virtue_item(item_roll));

    debug!(name, ?virtues, guard, item_roll, "rolled knight");

    Character {
        name: name.to_owned(),
        role: Role::Knight,
        virtues,
        max_virtues: virtues,
        guard,
        max_guard: guard,
        equipment,
        wounds: Vec::new(),
        knight: Some(KnightTraits {
            feats: vec![Feat::Smite, Feat::Focus, Feat::Deny],
            oath: KNIGHTLY_OATH.iter().map(|tenet| (*tenet).to_owned()).collect(),
            has_squire,
        }),
    }
}

/// Rolls a new Squire: 1d6 per virtue and a d6 guard.
pub fn generate_squire(name: &str, rng: &mut dyn DeterministicRng) -> Character {
    let virtues = Virtues {
        vigour: roll_virtue(rng, 1),
        clarity: roll_virtue(rng, 1),
        spirit: roll_virtue(rng, 1),
    };
    let guard = d6(rng);

    debug!(name, ?virtues, guard, "rolled squire");

    Character {
        name: name.to_owned(),
        role: Role::Squire,
        virtues,
        max_virtues: virtues,
        guard,
        max_guard: guard,
        equipment: squire_equipment(),
        wounds: Vec::new(),
        knight: None,
    }
}

/// Rolls a character for the given role.
pub fn generate_character(name: &str, role: Role, rng: &mut dyn DeterministicRng) -> Character {
    match role {
        Role::Knight => generate_knight(name, false, rng),
        Role::Squire => generate_squire(name, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastionlands_core::determinism::SeededRng;
    use bastionlands_test_support::SequenceRng;
    use proptest::prelude::*;

    #[test]
    fn test_knight_sums_two_dice_per_virtue() {
        // vigour 3+4, clarity 6+6, spirit 1+2, guard 9, virtue item roll 5
        let mut rng = SequenceRng::new(vec![3, 4, 6, 6, 1, 2, 9, 5]);

        let knight = generate_knight("Ser Aldric", true, &mut rng);

        assert_eq!(knight.virtues.vigour, 7);
        assert_eq!(knight.virtues.clarity, 12);
        assert_eq!(knight.virtues.spirit, 3);
        assert_eq!(knight.guard, 9);
        assert_eq!(knight.max_guard, 9);
        assert_eq!(knight.max_virtues, knight.virtues);
        assert_eq!(knight.equipment.last().unwrap().name, "Shield");
        let traits = knight.knight.as_ref().unwrap();
        assert!(traits.has_squire);
        assert_eq!(traits.feats, vec![Feat::Smite, Feat::Focus, Feat::Deny]);
        assert_eq!(traits.oath, vec!["Seek the Myths", "Honour the Seers", "Protect the Realm"]);
    }

    #[test]
    fn test_virtue_item_table_entries() {
        assert_eq!(virtue_item(1).name, "Cudgel");
        assert_eq!(virtue_item(5).name, "Shield");
        assert_eq!(virtue_item(5).kind, ItemKind::Armour { value: 1 });
        assert_eq!(virtue_item(6).name, "Warhorse");
    }

    #[test]
    fn test_squire_has_no_knight_traits() {
        let mut rng = SequenceRng::new(vec![2, 5, 1, 4]);

        let squire = generate_squire("Wat", &mut rng);

        assert_eq!(squire.role, Role::Squire);
        assert_eq!(squire.virtues, Virtues { vigour: 2, clarity: 5, spirit: 1 });
        assert_eq!(squire.guard, 4);
        assert!(squire.knight.is_none());
        assert_eq!(squire.equipment, squire_equipment());
    }

    #[test]
    fn test_armour_and_weapon_die_from_equipment() {
        let mut rng = SequenceRng::new(vec![3, 3, 3, 3, 3, 3, 6, 5]);
        let knight = generate_knight("Ser Bryn", false, &mut rng);

        // Gambeson plus Shield.
        assert_eq!(knight.armour(), 2);
        assert_eq!(knight.weapon_die(), 8);
    }

    #[test]
    fn test_virtue_parses_common_spellings() {
        assert_eq!("VIG".parse::<Virtue>().unwrap(), Virtue::Vigour);
        assert_eq!("vigor".parse::<Virtue>().unwrap(), Virtue::Vigour);
        assert_eq!(" Clarity ".parse::<Virtue>().unwrap(), Virtue::Clarity);
        assert_eq!("spi".parse::<Virtue>().unwrap(), Virtue::Spirit);
        assert!("charisma".parse::<Virtue>().is_err());
    }

    proptest! {
        #[test]
        fn prop_knights_roll_within_tables(seed in any::<u64>()) {
            let mut rng = SeededRng::from_seed(seed);
            let knight = generate_character("Ser Test", Role::Knight, &mut rng);

            for virtue in [Virtue::Vigour, Virtue::Clarity, Virtue::Spirit] {
                prop_assert!((2..=12).contains(&knight.virtues.get(virtue)));
            }
            prop_assert!((1..=12).contains(&knight.guard));
            prop_assert!(knight.equipment.len() > knight_base_equipment().len());
        }

        #[test]
        fn prop_squires_roll_within_tables(seed in any::<u64>()) {
            let mut rng = SeededRng::from_seed(seed);
            let squire = generate_character("Squire Test", Role::Squire, &mut rng);

            for virtue in [Virtue::Vigour, Virtue::Clarity, Virtue::Spirit] {
                prop_assert!((1..=6).contains(&squire.virtues.get(virtue)));
            }
            prop_assert!((1..=12).contains(&squire.guard));
        }
    }
}
