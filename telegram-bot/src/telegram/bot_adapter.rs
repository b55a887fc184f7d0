//! Wraps teloxide::Bot and implements [`crate::core::Bot`]. Production code talks to Telegram; tests substitute another Bot impl.

use crate::core::{parse_message_id, Bot as CoreBot, Chat, DbotError, Result};
use async_trait::async_trait;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, MessageId, ReplyParameters};
use teloxide::{ApiError, RequestError};
use tracing::debug;

/// Rate limits keep their wait; everything else becomes a delivery error.
fn map_request_error(e: RequestError) -> DbotError {
    match e {
        RequestError::RetryAfter(secs) => DbotError::RetryAfter(secs.duration()),
        other => DbotError::Bot(other.to_string()),
    }
}

/// Thin wrapper around teloxide::Bot that implements core's Bot trait.
#[derive(Clone)]
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    /// Creates an adapter from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, reply_to: Option<&str>, text: &str) -> Result<String> {
        let mut request = self.bot.send_message(ChatId(chat.id), text);
        if let Some(id) = reply_to {
            request = request.reply_parameters(ReplyParameters::new(MessageId(parse_message_id(id)?)));
        }
        let sent = request.await.map_err(map_request_error)?;
        Ok(sent.id.0.to_string())
    }

    async fn edit_message(&self, chat: &Chat, message_id: &str, text: &str) -> Result<()> {
        let id = parse_message_id(message_id)?;
        match self
            .bot
            .edit_message_text(ChatId(chat.id), MessageId(id), text)
            .await
        {
            Ok(_) => Ok(()),
            Err(RequestError::Api(ApiError::MessageNotModified)) => {
                debug!(message_id = %message_id, "Message not modified, treating as success");
                Ok(())
            }
            Err(e) => Err(map_request_error(e)),
        }
    }

    async fn send_typing(&self, chat: &Chat) -> Result<()> {
        self.bot
            .send_chat_action(ChatId(chat.id), ChatAction::Typing)
            .await
            .map_err(map_request_error)?;
        Ok(())
    }
}
