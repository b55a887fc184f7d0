//! Inbound message and entity types for the core model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{chat::Chat, user::User};
use crate::conversation::ConversationKey;

/// Entity kinds the dispatch loop cares about; everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// `@username`
    Mention,
    /// `/command`
    BotCommand,
    Other,
}

/// A message entity with the literal text it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntity {
    pub kind: EntityKind,
    pub text: String,
}

impl MessageEntity {
    pub fn mention(text: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::Mention,
            text: text.into(),
        }
    }
}

/// A single inbound text message: sender, chat, text and entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Transport message id (Telegram numeric string); used as the reply target.
    pub id: String,
    pub user: User,
    pub chat: Chat,
    pub content: String,
    pub entities: Vec<MessageEntity>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Conversation this message belongs to: `chat_id:user_id`.
    pub fn conversation_key(&self) -> ConversationKey {
        ConversationKey::new(self.chat.id, self.user.id)
    }

    /// True when the text starts with `/`.
    pub fn is_command(&self) -> bool {
        self.content.starts_with('/')
    }
}
