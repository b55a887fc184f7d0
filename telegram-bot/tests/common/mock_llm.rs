//! Mock [`llm_client::LlmClient`]: scripted completions, records every transcript it was given.

use async_trait::async_trait;
use llm_client::{ChatCompletion, CompletionError, LlmClient};
use prompt::{ChatMessage, TokenUsage};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Returns queued results in order; when the queue is empty replies `"reply to: <last message>"`
/// costing 2 tokens.
#[derive(Default)]
pub struct MockLlm {
    results: Mutex<VecDeque<Result<ChatCompletion, CompletionError>>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, content: &str, usage: TokenUsage) {
        self.results.lock().unwrap().push_back(Ok(ChatCompletion {
            content: content.to_string(),
            usage,
        }));
    }

    pub fn push_error(&self, error: CompletionError) {
        self.results.lock().unwrap().push_back(Err(error));
    }

    /// Every transcript passed to `complete`, in call order.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion, CompletionError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        if let Some(result) = self.results.lock().unwrap().pop_front() {
            return result;
        }
        let last = messages.last().map(|m| m.content.as_str()).unwrap_or("");
        Ok(ChatCompletion {
            content: format!("reply to: {}", last),
            usage: TokenUsage::new(1, 1, 2),
        })
    }
}
