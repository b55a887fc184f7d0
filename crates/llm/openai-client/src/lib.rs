//! # OpenAI API client
//!
//! One request, one reply: posts the transcript to the chat completions endpoint and returns the
//! first choice together with the token usage. No streaming and no retry at this layer; every
//! failure is surfaced as a [`CompletionError`].
//!
//! Provides token masking for safe logging.

use prompt::{ChatMessage, TokenUsage};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default API base; `/chat/completions` is appended.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Model used for every request.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
/// Low temperature so assistant answers stay close to deterministic.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Masks an API key/token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the key.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 || !token.is_char_boundary(7) || !token.is_char_boundary(len - 4) {
        "***".to_string()
    } else {
        format!("{}***{}", &token[..7], &token[len - 4..])
    }
}

/// Failures of a single completion call.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Non-2xx status; displays as the status line, e.g. `429 Too Many Requests`.
    #[error("{0}")]
    Upstream(StatusCode),

    #[error("failed to decode completion response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no choices in completion response")]
    NoChoices,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// The assistant reply and what it cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCompletion {
    pub content: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: TokenUsage,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI chat client. Cheap to clone; the inner `reqwest::Client` is shared and safe to use concurrently.
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    temperature: f32,
}

impl OpenAIClient {
    /// Builds a client using the given API key and default API base URL.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Builds a client with a custom base URL (e.g. for proxies, compatible endpoints or a mock server).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self::with_client(Client::new(), api_key, base_url)
    }

    /// Builds a client from an existing `reqwest::Client`.
    pub fn with_client(client: Client, api_key: String, base_url: String) -> Self {
        let endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        Self {
            client,
            api_key,
            endpoint,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends the transcript and returns the first choice's content plus token usage.
    ///
    /// Logs masked API key and token usage.
    pub async fn chat_completion(
        &self,
        messages: &[ChatMessage],
    ) -> Result<ChatCompletion, CompletionError> {
        info!(
            model = %self.model,
            message_count = messages.len(),
            api_key = %mask_token(&self.api_key),
            "OpenAI chat_completion request"
        );

        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = %status, body = %body, "OpenAI chat_completion failed");
            return Err(CompletionError::Upstream(status));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;
        debug!(choices = parsed.choices.len(), "OpenAI chat_completion decoded");

        info!(
            prompt_tokens = parsed.usage.prompt_tokens,
            completion_tokens = parsed.usage.completion_tokens,
            total_tokens = parsed.usage.total_tokens,
            "OpenAI chat_completion usage"
        );

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(CompletionError::NoChoices)?;

        Ok(ChatCompletion {
            content: choice.message.content.unwrap_or_default(),
            usage: parsed.usage,
        })
    }
}
