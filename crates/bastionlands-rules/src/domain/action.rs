//! Declared actions: intent, leverage, cost and risk, and how they resolve.

use std::fmt;

use bastionlands_core::determinism::DeterministicRng;
use serde::{Deserialize, Serialize};

use super::character::{Character, Virtue};
use super::dice::{LuckOutcome, LuckRoll, luck_roll};
use super::resolution::{SaveResult, make_save};

/// What an action puts on the line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Risk {
    #[default]
    None,
    Save,
    Luck,
}

impl Risk {
    /// Lenient parse of a model-supplied label. Unknown labels carry no risk.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "save" | "high" | "medium" => Self::Save,
            "luck" | "luck_roll" | "luck roll" => Self::Luck,
            _ => Self::None,
        }
    }
}

impl fmt::Display for Risk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Save => f.write_str("save"),
            Self::Luck => f.write_str("luck"),
        }
    }
}

/// A declared action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// What the knight is trying to do.
    pub intent: String,
    /// What makes it possible.
    pub leverage: String,
    /// Resource, virtue or side effect paid.
    pub cost: Option<String>,
    pub risk: Risk,
}

/// How an action moves the fiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    /// Move in a good direction.
    Advance,
    /// Lessen a threat.
    Disrupt,
    /// Put a problem to rest.
    Resolve,
    /// Create a new problem.
    Threaten,
    /// Make a problem worse.
    Escalate,
    /// Deliver on a threat.
    Execute,
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Advance => "advance",
            Self::Disrupt => "disrupt",
            Self::Resolve => "resolve",
            Self::Threaten => "threaten",
            Self::Escalate => "escalate",
            Self::Execute => "execute",
        };
        f.write_str(label)
    }
}

fn mentions(text: &str, words: &[&str]) -> bool {
    words.iter().any(|word| text.contains(word))
}

/// Outcome of a successful action, chosen by intent keywords.
#[must_use]
pub fn success_outcome(intent: &str) -> ActionOutcome {
    let lower = intent.to_ascii_lowercase();
    if mentions(&lower, &["solve", "fix", "heal", "restore"]) {
        ActionOutcome::Resolve
    } else if mentions(&lower, &["weaken", "reduce", "lessen", "distract"]) {
        ActionOutcome::Disrupt
    } else {
        ActionOutcome::Advance
    }
}

/// Outcome of a failed action, chosen by intent keywords.
#[must_use]
pub fn failure_outcome(intent: &str) -> ActionOutcome {
    let lower = intent.to_ascii_lowercase();
    if mentions(&lower, &["attack", "fight", "strike"]) {
        ActionOutcome::Execute
    } else if mentions(&lower, &["sneak", "hide", "avoid"]) {
        ActionOutcome::Threaten
    } else {
        ActionOutcome::Escalate
    }
}

/// The virtue a risky intent is saved against.
#[must_use]
pub fn save_virtue(intent: &str) -> Virtue {
    let lower = intent.to_ascii_lowercase();
    if mentions(
        &lower,
        &["climb", "lift", "force", "break", "swim", "run", "carry", "push"],
    ) {
        Virtue::Vigour
    } else if mentions(
        &lower,
        &["persuade", "resist", "endure", "pray", "command", "inspire", "intimidate"],
    ) {
        Virtue::Spirit
    } else {
        Virtue::Clarity
    }
}

/// A virtue loss implied by the declared cost.
#[must_use]
pub fn cost_virtue_loss(cost: Option<&str>) -> Option<(Virtue, u32)> {
    let lower = cost?.to_ascii_lowercase();
    if mentions(&lower, &["exhaust", "overexert", "fatigue"]) {
        Some((Virtue::Vigour, 1))
    } else if mentions(&lower, &["confuse", "overwhelm", "panic"]) {
        Some((Virtue::Clarity, 1))
    } else if mentions(&lower, &["despair", "betray", "abandon"]) {
        Some((Virtue::Spirit, 1))
    } else {
        None
    }
}

/// The dice behind a resolved action, if any were rolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RollRecord {
    Save(SaveResult),
    Luck(LuckRoll),
}

/// Result of resolving an action for one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub outcome: ActionOutcome,
    pub roll: Option<RollRecord>,
    /// Virtue points paid as the action's cost.
    pub virtue_loss: Option<(Virtue, u32)>,
}

/// Resolves an action for `character`. Riskless actions succeed outright;
/// saves succeed or fail on the d20; luck rolls always complete, with a
/// crisis counting as a failure. A declared cost is paid on success.
pub fn resolve_action(
    action: &Action,
    character: &mut Character,
    rng: &mut dyn DeterministicRng,
) -> ActionResult {
    let (success, roll) = match action.risk {
        Risk::None => (true, None),
        Risk::Save => {
            let save = make_save(character, save_virtue(&action.intent), None, rng);
            (save.success, Some(RollRecord::Save(save)))
        }
        Risk::Luck => {
            let luck = luck_roll(rng);
            let success = luck.outcome != LuckOutcome::Crisis;
            (success, Some(RollRecord::Luck(luck)))
        }
    };

    let outcome = if success {
        success_outcome(&action.intent)
    } else {
        failure_outcome(&action.intent)
    };

    let virtue_loss = if success {
        cost_virtue_loss(action.cost.as_deref())
    } else {
        None
    };
    if let Some((virtue, amount)) = virtue_loss {
        let score = match virtue {
            Virtue::Vigour => &mut character.virtues.vigour,
            Virtue::Clarity => &mut character.virtues.clarity,
            Virtue::Spirit => &mut character.virtues.spirit,
        };
        *score = score.saturating_sub(amount);
    }

    ActionResult {
        success,
        outcome,
        roll,
        virtue_loss,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::character::generate_knight;
    use bastionlands_test_support::SequenceRng;

    fn knight() -> Character {
        let mut rng = SequenceRng::new(vec![5, 5, 4, 4, 3, 3, 3, 2]);
        generate_knight("Ser Test", false, &mut rng)
    }

    fn action(intent: &str, risk: Risk) -> Action {
        Action {
            intent: intent.to_owned(),
            leverage: "a steady hand".to_owned(),
            cost: None,
            risk,
        }
    }

    #[test]
    fn test_risk_labels_parse_leniently() {
        assert_eq!(Risk::from_label("Save"), Risk::Save);
        assert_eq!(Risk::from_label("luck_roll"), Risk::Luck);
        assert_eq!(Risk::from_label("low"), Risk::None);
        assert_eq!(Risk::from_label(""), Risk::None);
    }

    #[test]
    fn test_outcome_keywords() {
        assert_eq!(success_outcome("heal the seer"), ActionOutcome::Resolve);
        assert_eq!(success_outcome("distract the guard"), ActionOutcome::Disrupt);
        assert_eq!(success_outcome("cross the bridge"), ActionOutcome::Advance);
        assert_eq!(failure_outcome("strike the troll"), ActionOutcome::Execute);
        assert_eq!(failure_outcome("hide in the reeds"), ActionOutcome::Threaten);
        assert_eq!(failure_outcome("cross the bridge"), ActionOutcome::Escalate);
    }

    #[test]
    fn test_riskless_action_succeeds_without_rolling() {
        let mut character = knight();
        let mut rng = SequenceRng::new(vec![]);

        let result = resolve_action(&action("cross the bridge", Risk::None), &mut character, &mut rng);

        assert!(result.success);
        assert_eq!(result.outcome, ActionOutcome::Advance);
        assert!(result.roll.is_none());
    }

    #[test]
    fn test_failed_save_uses_failure_outcome() {
        let mut character = knight();
        // Clarity 8, roll 12.
        let mut rng = SequenceRng::new(vec![12]);

        let result = resolve_action(&action("sneak past", Risk::Save), &mut character, &mut rng);

        assert!(!result.success);
        assert_eq!(result.outcome, ActionOutcome::Threaten);
        match result.roll {
            Some(RollRecord::Save(save)) => {
                assert_eq!(save.virtue, Virtue::Clarity);
                assert_eq!(save.target, 8);
            }
            other => panic!("expected a save, got {other:?}"),
        }
    }

    #[test]
    fn test_luck_crisis_counts_as_failure() {
        let mut character = knight();
        let mut rng = SequenceRng::new(vec![1]);

        let result = resolve_action(&action("open the tomb", Risk::Luck), &mut character, &mut rng);

        assert!(!result.success);
        assert_eq!(
            result.roll,
            Some(RollRecord::Luck(LuckRoll {
                roll: 1,
                outcome: LuckOutcome::Crisis
            }))
        );
    }

    #[test]
    fn test_cost_is_paid_on_success() {
        let mut character = knight();
        let mut rng = SequenceRng::new(vec![]);
        let mut declared = action("haul the cart", Risk::None);
        declared.cost = Some("exhausting effort".to_owned());

        let result = resolve_action(&declared, &mut character, &mut rng);

        assert_eq!(result.virtue_loss, Some((Virtue::Vigour, 1)));
        assert_eq!(character.virtues.vigour, 9);
    }

    #[test]
    fn test_save_virtue_by_keyword() {
        assert_eq!(save_virtue("climb the tower"), Virtue::Vigour);
        assert_eq!(save_virtue("persuade the warden"), Virtue::Spirit);
        assert_eq!(save_virtue("study the carvings"), Virtue::Clarity);
    }
}
