//! Turning model output into a structured action declaration.

use serde::{Deserialize, Serialize};

use super::intent::Intent;
use super::model::ModelError;

/// Where an interpretation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpretationSource {
    /// Parsed from the language model's answer.
    Model,
    /// Local keyword classification after the model failed.
    Fallback,
    /// Chosen explicitly by the player.
    Player,
}

/// A player action in the game's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    pub intent: Intent,
    pub leverage: String,
    pub cost: Option<String>,
    /// Risk label as given (`none`, `save`, `luck`); callers parse leniently.
    pub risk: String,
    pub source: InterpretationSource,
}

impl Interpretation {
    /// Keyword classification of the raw text with no leverage, cost or risk.
    #[must_use]
    pub fn fallback(player_input: &str) -> Self {
        Self {
            intent: Intent::classify(player_input),
            leverage: String::new(),
            cost: None,
            risk: "none".to_owned(),
            source: InterpretationSource::Fallback,
        }
    }

    /// An interpretation for an action picked from the suggested options.
    #[must_use]
    pub fn chosen(intent: Intent, risk: Option<String>) -> Self {
        Self {
            intent,
            leverage: String::new(),
            cost: None,
            risk: risk.unwrap_or_else(|| "none".to_owned()),
            source: InterpretationSource::Player,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawInterpretation {
    intent: String,
    #[serde(default)]
    leverage: Option<String>,
    #[serde(default)]
    cost: Option<String>,
    #[serde(default, alias = "risk_level")]
    risk: Option<String>,
}

/// Parses the model's answer. The JSON object may be wrapped in code fences
/// or prose; everything between the first `{` and the last `}` is parsed.
///
/// # Errors
///
/// Returns `ModelError::Malformed` if no object is found, it does not
/// deserialize, or its intent is blank.
pub fn parse_interpretation(raw: &str) -> Result<Interpretation, ModelError> {
    let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) else {
        return Err(ModelError::Malformed("no JSON object in response".into()));
    };
    if end < start {
        return Err(ModelError::Malformed("no JSON object in response".into()));
    }

    let parsed: RawInterpretation = serde_json::from_str(&raw[start..=end])
        .map_err(|e| ModelError::Malformed(format!("interpretation did not parse: {e}")))?;

    if parsed.intent.trim().is_empty() {
        return Err(ModelError::Malformed("interpretation has no intent".into()));
    }

    Ok(Interpretation {
        intent: Intent::from_label(&parsed.intent),
        leverage: parsed.leverage.unwrap_or_default(),
        cost: parsed.cost.filter(|cost| !cost.trim().is_empty()),
        risk: parsed.risk.unwrap_or_else(|| "none".to_owned()),
        source: InterpretationSource::Model,
    })
}
