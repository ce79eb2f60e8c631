//! Model calls made during a turn, with their timeout and fallback policy.

use std::sync::Arc;
use std::time::Duration;

use bastionlands_narrative::domain::interpretation::{Interpretation, parse_interpretation};
use bastionlands_narrative::domain::model::{LanguageModel, ModelError};
use bastionlands_narrative::domain::prompt::{
    FALLBACK_NARRATIVE, Prompt, interpret_prompt, narrate_prompt,
};
use tracing::{debug, warn};

/// Wraps the language model. Every call is bounded by `timeout`, and no
/// model failure ever reaches the caller.
#[derive(Clone)]
pub struct Narrator {
    model: Arc<dyn LanguageModel>,
    timeout: Duration,
}

impl std::fmt::Debug for Narrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Narrator")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Narrator {
    #[must_use]
    pub fn new(model: Arc<dyn LanguageModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn call(&self, prompt: &Prompt) -> Result<String, ModelError> {
        match tokio::time::timeout(self.timeout, self.model.generate(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(ModelError::Timeout(self.timeout)),
        }
    }

    /// Asks the model what the player meant. Falls back to keyword
    /// classification of the raw text if the model fails or answers nonsense.
    pub async fn interpret(&self, context: &str, player_input: &str) -> Interpretation {
        let prompt = interpret_prompt(context, player_input);
        match self
            .call(&prompt)
            .await
            .and_then(|raw| parse_interpretation(&raw))
        {
            Ok(interpretation) => {
                debug!(intent = %interpretation.intent, "model interpreted input");
                interpretation
            }
            Err(e) => {
                warn!(error = %e, "interpretation failed, classifying locally");
                Interpretation::fallback(player_input)
            }
        }
    }

    /// Asks the model to narrate `outcome`. On failure the fixed fallback
    /// line is returned, followed by the outcome itself.
    pub async fn narrate(&self, context: &str, player_input: &str, outcome: &str) -> String {
        let prompt = narrate_prompt(context, player_input, outcome);
        match self.call(&prompt).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!("model returned empty narration, using fallback");
                format!("{FALLBACK_NARRATIVE}\n\n{outcome}")
            }
            Err(e) => {
                warn!(error = %e, "narration failed, using fallback");
                format!("{FALLBACK_NARRATIVE}\n\n{outcome}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use bastionlands_narrative::domain::intent::Intent;
    use bastionlands_narrative::domain::interpretation::InterpretationSource;
    use bastionlands_test_support::{
        FailingLanguageModel, ScriptedLanguageModel, SlowLanguageModel,
    };

    #[tokio::test]
    async fn test_interpretation_from_fenced_json() {
        // Arrange
        let model = Arc::new(ScriptedLanguageModel::new([
            "```json\n{\"intent\": \"explore\", \"leverage\": \"keen eyes\", \"cost\": null, \"risk\": \"none\"}\n```",
        ]));
        let narrator = Narrator::new(model.clone(), Duration::from_secs(1));

        // Act
        let interpretation = narrator.interpret("Company: The Ashen Oath", "look around").await;

        // Assert
        assert_eq!(interpretation.intent, Intent::Explore);
        assert_eq!(interpretation.leverage, "keen eyes");
        assert_eq!(interpretation.source, InterpretationSource::Model);
        assert!(model.prompts()[0].user.contains("PLAYER INPUT: look around"));
    }

    #[tokio::test]
    async fn test_malformed_answer_falls_back_to_keywords() {
        let model = Arc::new(ScriptedLanguageModel::new(["I would rather not say."]));
        let narrator = Narrator::new(model, Duration::from_secs(1));

        let interpretation = narrator.interpret("", "make camp by the river").await;

        assert_eq!(interpretation.intent, Intent::Rest);
        assert_eq!(interpretation.source, InterpretationSource::Fallback);
    }

    #[tokio::test]
    async fn test_unreachable_model_narrates_the_fallback() {
        let narrator = Narrator::new(Arc::new(FailingLanguageModel), Duration::from_secs(1));

        let text = narrator.narrate("", "rest", "The company makes camp.").await;

        assert!(text.starts_with(FALLBACK_NARRATIVE));
        assert!(text.ends_with("The company makes camp."));
    }

    #[tokio::test]
    async fn test_slow_model_times_out_to_the_fallback() {
        // Arrange
        let narrator = Narrator::new(
            Arc::new(SlowLanguageModel(Duration::from_secs(5))),
            Duration::from_millis(50),
        );
        let started = Instant::now();

        // Act
        let text = narrator.narrate("", "rest", "The company makes camp.").await;
        let interpretation = narrator.interpret("", "search the ruins").await;

        // Assert
        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(text.starts_with(FALLBACK_NARRATIVE));
        assert_eq!(interpretation.source, InterpretationSource::Fallback);
        assert_eq!(interpretation.intent, Intent::Explore);
    }

    #[tokio::test]
    async fn test_model_narration_is_returned_as_is() {
        let narrator = Narrator::new(
            Arc::new(ScriptedLanguageModel::new(["The fire crackles."])),
            Duration::from_secs(1),
        );

        let text = narrator.narrate("", "rest", "The company makes camp.").await;

        assert_eq!(text, "The fire crackles.");
    }
}
