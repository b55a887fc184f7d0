//! Handlers for logging and the optional allow-list.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, instrument};

use crate::config::EnvConfig;
use crate::core::{Bot, Handler, HandlerResponse, Message, Result};
use crate::dispatch::reply_target;

/// Sent to senders outside the allow-list.
pub const DENIED_TEXT: &str = "You are not authorized to use this bot.";

/// Logs each message in before() and the response in after(); always continues.
pub struct LoggingHandler;

#[async_trait]
impl Handler for LoggingHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            conversation_key = %message.conversation_key(),
            username = %message.user.username.as_deref().unwrap_or("unknown"),
            content_len = message.content.chars().count(),
            "Received message"
        );
        Ok(true)
    }

    #[instrument(skip(self, message, response))]
    async fn after(&self, message: &Message, response: &HandlerResponse) -> Result<()> {
        debug!(
            message_id = %message.id,
            conversation_key = %message.conversation_key(),
            response = response.kind(),
            reply_len = ?response.reply_len(),
            "Processed message"
        );
        Ok(())
    }
}

/// Stops the chain with a denial notice if the sender is not in a non-empty allow-list.
pub struct AuthHandler {
    config: Arc<EnvConfig>,
    bot: Arc<dyn Bot>,
}

impl AuthHandler {
    /// Checks senders with [`EnvConfig::is_allowed`]; an empty `TELEGRAM_ID` lets everyone through.
    pub fn new(config: Arc<EnvConfig>, bot: Arc<dyn Bot>) -> Self {
        Self { config, bot }
    }
}

#[async_trait]
impl Handler for AuthHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        let user_id = message.user.id;
        if self.config.is_allowed(user_id) {
            debug!(user_id, "User authorized");
            return Ok(true);
        }

        info!(user_id, chat_id = message.chat.id, "User is not allowed to use this bot");
        if let Err(e) = self
            .bot
            .send_message(&message.chat, reply_target(message), DENIED_TEXT)
            .await
        {
            error!(error = %e, user_id, "Failed to send denial notice");
        }
        Ok(false)
    }
}
