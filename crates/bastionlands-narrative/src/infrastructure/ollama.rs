//! Ollama-compatible chat client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::model::{LanguageModel, ModelError};
use crate::domain::prompt::Prompt;

/// Talks to `POST {base_url}/api/chat` without streaming.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl OllamaClient {
    /// Creates a client. `timeout` bounds each request end to end.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Unreachable` if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ModelError::Unreachable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            model: model.into(),
            timeout,
        })
    }

    /// The model name sent with every request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &Prompt) -> Result<String, ModelError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout(self.timeout)
                } else {
                    ModelError::Unreachable(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Status { status, body });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Malformed(e.to_string()))?;

        let content = parsed.message.content.trim().to_owned();
        if content.is_empty() {
            return Err(ModelError::Malformed("empty completion".into()));
        }
        debug!(chars = content.len(), "model completion received");
        Ok(content)
    }
}
