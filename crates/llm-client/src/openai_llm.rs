//! LlmClient backed by openai-client: forwards the transcript unchanged.

use async_trait::async_trait;
use openai_client::{ChatCompletion, CompletionError, OpenAIClient};
use prompt::ChatMessage;
use tracing::instrument;

use super::LlmClient;

/// OpenAI-backed [`LlmClient`].
#[derive(Clone)]
pub struct OpenAILlmClient {
    client: OpenAIClient,
}

impl OpenAILlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: OpenAIClient::new(api_key),
        }
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: OpenAIClient::with_base_url(api_key, base_url),
        }
    }

    pub fn from_client(client: OpenAIClient) -> Self {
        Self { client }
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, messages), fields(model = %self.client.model()))]
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion, CompletionError> {
        self.client.chat_completion(messages).await
    }
}
