//! The language model seam.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::prompt::Prompt;

/// Failures talking to a language model. None of these ever reach a player;
/// the turn pipeline substitutes fallback behaviour instead.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The endpoint could not be reached.
    #[error("language model unreachable: {0}")]
    Unreachable(String),

    /// The call did not finish in time.
    #[error("language model timed out after {0:?}")]
    Timeout(Duration),

    /// The endpoint answered with a non-success status.
    #[error("language model returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The endpoint answered but the content was unusable.
    #[error("malformed language model output: {0}")]
    Malformed(String),
}

/// Something that turns a prompt into text.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generates a completion for `prompt`.
    async fn generate(&self, prompt: &Prompt) -> Result<String, ModelError>;
}
