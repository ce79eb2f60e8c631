//! The closed set of things a player can ask for.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What the player wants to do this turn.
///
/// Anything the model or the keyword classifier cannot place lands in
/// `Unrecognized`, carrying the label it was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Intent {
    Explore,
    Travel,
    Rest,
    Combat,
    Status,
    Unrecognized(String),
}

const EXPLORE_WORDS: &[&str] = &["explore", "search", "investigate", "look", "examine", "scout"];
const TRAVEL_WORDS: &[&str] = &[
    "travel", "move", "go", "walk", "ride", "journey", "head", "north", "south", "east", "west",
];
const REST_WORDS: &[&str] = &["rest", "camp", "sleep", "recover"];
const COMBAT_WORDS: &[&str] = &["attack", "fight", "combat", "strike", "charge", "ambush"];
const STATUS_WORDS: &[&str] = &["status", "check", "stats", "inventory", "condition"];

/// Short keywords must match a whole word; longer ones also match as a
/// prefix ("attacking", "northern").
fn keyword_matches(token: &str, keyword: &str) -> bool {
    token == keyword || (keyword.len() > 3 && token.starts_with(keyword))
}

impl Intent {
    /// Maps a label such as the model's `intent` field onto the enum. A
    /// whole label or close synonym matches first; otherwise the first word in
    /// a descriptive label that names a handler wins ("travel north",
    /// "rest at camp").
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let lower = label.trim().to_ascii_lowercase();
        if let Some(intent) = Self::handler_for(&lower) {
            return intent;
        }
        lower
            .split(|c: char| !c.is_ascii_alphanumeric())
            .find_map(Self::handler_for)
            .unwrap_or_else(|| Self::Unrecognized(label.trim().to_owned()))
    }

    fn handler_for(word: &str) -> Option<Self> {
        match word {
            "explore" | "search" | "investigate" | "exploration" => Some(Self::Explore),
            "travel" | "move" | "journey" | "movement" => Some(Self::Travel),
            "rest" | "camp" | "sleep" => Some(Self::Rest),
            "combat" | "fight" | "attack" => Some(Self::Combat),
            "status" | "check" | "check_status" => Some(Self::Status),
            _ => None,
        }
    }

    /// Keyword classification of raw player text, used when the model is
    /// unavailable. The first matching group wins, checked in a fixed order.
    #[must_use]
    pub fn classify(text: &str) -> Self {
        let lower = text.to_ascii_lowercase();
        let tokens: Vec<&str> = lower
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|token| !token.is_empty())
            .collect();
        let has = |words: &[&str]| {
            tokens
                .iter()
                .any(|token| words.iter().any(|word| keyword_matches(token, word)))
        };

        if has(COMBAT_WORDS) {
            Self::Combat
        } else if has(STATUS_WORDS) {
            Self::Status
        } else if has(REST_WORDS) {
            Self::Rest
        } else if has(TRAVEL_WORDS) {
            Self::Travel
        } else if has(EXPLORE_WORDS) {
            Self::Explore
        } else {
            Self::Unrecognized(text.trim().to_owned())
        }
    }

    /// Short label for logs and wire formats.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Explore => "explore",
            Self::Travel => "travel",
            Self::Rest => "rest",
            Self::Combat => "combat",
            Self::Status => "status",
            Self::Unrecognized(label) => label,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Intent {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<Intent> for String {
    fn from(intent: Intent) -> Self {
        intent.label().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_is_case_insensitive() {
        assert_eq!(Intent::from_label(" Explore "), Intent::Explore);
        assert_eq!(Intent::from_label("TRAVEL"), Intent::Travel);
    }

    #[test]
    fn test_unknown_label_is_kept() {
        assert_eq!(
            Intent::from_label("bargain with the seer"),
            Intent::Unrecognized("bargain with the seer".to_owned())
        );
    }

    #[test]
    fn test_descriptive_label_names_its_handler() {
        assert_eq!(Intent::from_label("travel north"), Intent::Travel);
        assert_eq!(Intent::from_label("Explore the ruins"), Intent::Explore);
        assert_eq!(Intent::from_label("make camp"), Intent::Rest);
        assert_eq!(
            Intent::from_label("climb the tower"),
            Intent::Unrecognized("climb the tower".to_owned())
        );
    }

    #[test]
    fn test_classify_by_keywords() {
        assert_eq!(Intent::classify("We ride north"), Intent::Travel);
        assert_eq!(Intent::classify("make camp for the night"), Intent::Rest);
        assert_eq!(Intent::classify("attack the bandits"), Intent::Combat);
        assert_eq!(Intent::classify("search the ruins"), Intent::Explore);
        assert_eq!(Intent::classify("check our wounds"), Intent::Status);
    }

    #[test]
    fn test_short_keywords_match_whole_words() {
        assert_eq!(Intent::classify("go"), Intent::Travel);
        assert_eq!(
            Intent::classify("forgo the feast"),
            Intent::Unrecognized("forgo the feast".to_owned())
        );
    }

    #[test]
    fn test_serializes_as_label() {
        let json = serde_json::to_value(Intent::Rest).unwrap();
        assert_eq!(json, "rest");

        let parsed: Intent = serde_json::from_value(serde_json::json!("combat")).unwrap();
        assert_eq!(parsed, Intent::Combat);
    }
}
