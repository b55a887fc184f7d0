//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait and an OpenAI implementation. The dispatch loop depends only on
//! the trait, so tests and alternative backends can stand in for the HTTP client.

use async_trait::async_trait;
use prompt::ChatMessage;

mod openai_llm;

pub use openai_client::{mask_token, ChatCompletion, CompletionError};
pub use openai_llm::OpenAILlmClient;

/// LLM client interface: one completion for a whole transcript.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the model reply and token usage for the given transcript (system/user/assistant), sent as is.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion, CompletionError>;
}
