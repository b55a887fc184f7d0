//! Bot abstraction for sending and editing messages.
//!
//! [`Bot`] is transport-agnostic; `crate::telegram::TelegramBotAdapter` implements it via teloxide.

use crate::core::error::{DbotError, Result};
use crate::core::types::Chat;
use async_trait::async_trait;

/// Abstraction for sending and editing messages. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message and returns its id. `reply_to = None` means not a reply.
    async fn send_message(&self, chat: &Chat, reply_to: Option<&str>, text: &str) -> Result<String>;

    /// Replaces the text of an already-sent message. `message_id` is transport-specific (e.g. Telegram numeric string).
    async fn edit_message(&self, chat: &Chat, message_id: &str, text: &str) -> Result<()>;

    /// Shows the "typing…" indicator. A hint only; callers ignore failures.
    async fn send_typing(&self, chat: &Chat) -> Result<()>;
}

/// Parses a message id string into an i32. Used by send (reply target) and edit.
pub fn parse_message_id(s: &str) -> Result<i32> {
    s.parse()
        .map_err(|_| DbotError::Bot(format!("Invalid message_id: {}", s)))
}
