//! Command abstractions.

use uuid::Uuid;

/// Trait that all commands implement.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command (for logging/routing).
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through the system.
    fn correlation_id(&self) -> Uuid;

    /// The game session the command targets, if it targets an existing one.
    ///
    /// Commands that create a session return `None`.
    fn session_id(&self) -> Option<Uuid> {
        None
    }
}
