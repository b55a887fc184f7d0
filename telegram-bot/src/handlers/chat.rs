//! Chat turn handler: user message → completion → assistant message → paced reply.
//!
//! **External interactions:** [`Bot`] (typing hint, error notice), [`LlmClient`] (completion),
//! [`ConversationStore`] (transcript and usage), [`LiveOutput`] (reply delivery).

use std::sync::Arc;

use async_trait::async_trait;
use llm_client::{ChatCompletion, CompletionError, LlmClient};
use prompt::{ChatMessage, MessageRole};
use tracing::{debug, error, info, instrument, warn};

use crate::conversation::{ConversationKey, ConversationStore};
use crate::core::{Bot, Handler, HandlerResponse, Message, Result};
use crate::dispatch::reply_target;
use crate::live_output::LiveOutput;

/// Appends the per-turn token cost to a reply.
pub fn with_cost_footnote(reply: &str, total_tokens: u64) -> String {
    format!("{}\n\nThis turn cost `{}` tokens", reply, total_tokens)
}

fn log_transcript(key: &ConversationKey, transcript: &[ChatMessage]) {
    debug!(conversation_key = %key, count = transcript.len(), "Submitting transcript");
    for (i, m) in transcript.iter().enumerate() {
        debug!(
            index = i,
            role = %m.role,
            content_len = m.content.chars().count(),
            "transcript message"
        );
    }
}

/// Runs one conversation turn for every non-command message and ends the chain with `Reply`.
pub struct ChatHandler {
    bot: Arc<dyn Bot>,
    llm: Arc<dyn LlmClient>,
    store: Arc<ConversationStore>,
    live_output: LiveOutput,
}

impl ChatHandler {
    pub fn new(
        bot: Arc<dyn Bot>,
        llm: Arc<dyn LlmClient>,
        store: Arc<ConversationStore>,
        live_output: LiveOutput,
    ) -> Self {
        Self {
            bot,
            llm,
            store,
            live_output,
        }
    }

    /// Append → Complete → Append → AddUsage under the key's turn lock. A failed completion leaves
    /// the user message in the transcript.
    async fn run_turn(
        &self,
        key: &ConversationKey,
        text: &str,
    ) -> std::result::Result<ChatCompletion, CompletionError> {
        let lock = self.store.turn_lock(key);
        let _turn = lock.lock().await;

        let transcript = self.store.append(key, MessageRole::User, text);
        log_transcript(key, &transcript);

        let completion = self.llm.complete(&transcript).await?;
        self.store
            .append(key, MessageRole::Assistant, &completion.content);
        self.store.add_usage(key, &completion.usage);
        Ok(completion)
    }
}

#[async_trait]
impl Handler for ChatHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if message.is_command() {
            return Ok(HandlerResponse::Continue);
        }

        let key = message.conversation_key();
        let reply_to = reply_target(message);

        if let Err(e) = self.bot.send_typing(&message.chat).await {
            debug!(error = %e, "Typing indicator failed");
        }

        match self.run_turn(&key, &message.content).await {
            Ok(completion) => {
                info!(
                    conversation_key = %key,
                    total_tokens = completion.usage.total_tokens,
                    reply_len = completion.content.len(),
                    "Completion received"
                );
                let text = with_cost_footnote(&completion.content, completion.usage.total_tokens);
                self.live_output
                    .deliver(&message.chat, reply_to, &text)
                    .await
                    .map_err(|e| {
                        error!(error = %e, conversation_key = %key, "Failed to deliver reply");
                        e
                    })?;
                Ok(HandlerResponse::Reply(text))
            }
            Err(e) => {
                warn!(error = %e, conversation_key = %key, "Completion failed");
                let text = format!("Error: {}", e);
                self.bot
                    .send_message(&message.chat, reply_to, &text)
                    .await
                    .map_err(|e| {
                        error!(error = %e, conversation_key = %key, "Failed to send error notice");
                        e
                    })?;
                Ok(HandlerResponse::Reply(text))
            }
        }
    }
}
