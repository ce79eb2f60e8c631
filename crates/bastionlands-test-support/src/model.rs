//! Language model doubles.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bastionlands_narrative::domain::model::{LanguageModel, ModelError};
use bastionlands_narrative::domain::prompt::Prompt;

/// Replays scripted replies in order and records every prompt it receives.
/// Once the script runs out, every call fails as unreachable.
#[derive(Debug, Default)]
pub struct ScriptedLanguageModel {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<Prompt>>,
}

impl ScriptedLanguageModel {
    #[must_use]
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedLanguageModel {
    async fn generate(&self, prompt: &Prompt) -> Result<String, ModelError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ModelError::Unreachable("script exhausted".into()))
    }
}

/// Every call fails as unreachable.
#[derive(Debug)]
pub struct FailingLanguageModel;

#[async_trait]
impl LanguageModel for FailingLanguageModel {
    async fn generate(&self, _prompt: &Prompt) -> Result<String, ModelError> {
        Err(ModelError::Unreachable("connection refused".into()))
    }
}

/// Sleeps before answering, for exercising timeouts.
#[derive(Debug)]
pub struct SlowLanguageModel(pub Duration);

#[async_trait]
impl LanguageModel for SlowLanguageModel {
    async fn generate(&self, _prompt: &Prompt) -> Result<String, ModelError> {
        tokio::time::sleep(self.0).await;
        Ok("The answer arrives far too late.".to_owned())
    }
}
