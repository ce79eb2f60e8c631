//! Prompt templates.

use serde::Serialize;

/// Text shown when the model cannot narrate a turn.
pub const FALLBACK_NARRATIVE: &str =
    "Your words fail to carry meaning in this strange land. The wind stirs, and nothing answers.";

/// A rendered system/user prompt pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

const INTERPRETER_SYSTEM: &str = "\
You interpret player actions for Mythic Bastionlands, a dark fantasy role-playing game.
Classify the action and describe it in the game's terms.
Respond with a single JSON object and nothing else.";

const NARRATOR_SYSTEM: &str = "\
You are the Game Master for Mythic Bastionlands, a dark fantasy role-playing game.
The world is strange, old and full of myths. Be descriptive but concise.
Describe only what the outcome below says happened. Never invent dice results.";

/// Asks the model to classify `player_input` as an action.
#[must_use]
pub fn interpret_prompt(context: &str, player_input: &str) -> Prompt {
    let user = format!(
        "CURRENT SITUATION:\n{context}\n\nPLAYER INPUT: {player_input}\n\n\
         Respond with JSON:\n\
         {{\"intent\": \"explore|travel|rest|combat|status|<short description>\", \
         \"leverage\": \"what makes it possible\", \
         \"cost\": \"what it costs, or null\", \
         \"risk\": \"none|save|luck\"}}"
    );
    Prompt {
        system: INTERPRETER_SYSTEM.to_owned(),
        user,
    }
}

/// Asks the model to narrate a resolved turn.
#[must_use]
pub fn narrate_prompt(context: &str, player_input: &str, outcome: &str) -> Prompt {
    let user = format!(
        "GAME STATE:\n{context}\n\nPLAYER ACTION: {player_input}\n\nOUTCOME:\n{outcome}\n\n\
         Narrate this in two or three short paragraphs."
    );
    Prompt {
        system: NARRATOR_SYSTEM.to_owned(),
        user,
    }
}
