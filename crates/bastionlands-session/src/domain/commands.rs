//! Commands for the session context.

use bastionlands_core::command::Command;
use bastionlands_narrative::domain::intent::Intent;
use uuid::Uuid;

/// Command to roll a new company and open a session for it.
#[derive(Debug, Clone)]
pub struct NewGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// A previously reserved session id; a fresh one is used when absent.
    pub session_id: Option<Uuid>,
    pub company_name: String,
    pub knight_names: Vec<String>,
    /// Give every Knight a Squire.
    pub with_squires: bool,
}

impl Command for NewGame {
    fn command_type(&self) -> &'static str {
        "session.new_game"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to play a turn from the player's free text.
#[derive(Debug, Clone)]
pub struct SubmitCommand {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    pub session_id: Uuid,
    pub text: String,
}

impl Command for SubmitCommand {
    fn command_type(&self) -> &'static str {
        "session.submit_command"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn session_id(&self) -> Option<Uuid> {
        Some(self.session_id)
    }
}

/// Command to play a turn whose intent the player picked directly.
#[derive(Debug, Clone)]
pub struct SubmitAction {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    pub session_id: Uuid,
    pub intent: Intent,
    /// Optional wording, such as a travel direction.
    pub text: Option<String>,
    /// Risk label for unrecognized intents.
    pub risk: Option<String>,
}

impl Command for SubmitAction {
    fn command_type(&self) -> &'static str {
        "session.submit_action"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn session_id(&self) -> Option<Uuid> {
        Some(self.session_id)
    }
}

/// Command to open an encounter.
#[derive(Debug, Clone)]
pub struct StartCombat {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    pub session_id: Uuid,
    /// Enemy type, bandits or wolves. Bandits when absent.
    pub enemy: Option<String>,
}

impl Command for StartCombat {
    fn command_type(&self) -> &'static str {
        "session.start_combat"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn session_id(&self) -> Option<Uuid> {
        Some(self.session_id)
    }
}
