//! Conversions from teloxide types to core types.

use teloxide::types::MessageEntityKind;

use crate::core::{
    Chat, ChatKind, EntityKind, Message, MessageEntity, ToCoreMessage, ToCoreUser, User,
};

/// Telegram user → core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl ToCoreUser for TelegramUserWrapper<'_> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

/// Telegram message → core [`Message`]. Messages without text convert to `None`.
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl ToCoreMessage for TelegramMessageWrapper<'_> {
    fn to_core(&self) -> Option<Message> {
        let msg = self.0;
        let text = msg.text()?;

        Some(Message {
            id: msg.id.0.to_string(),
            user: msg
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(|| User::with_id(0)),
            chat: Chat::new(msg.chat.id.0, self.chat_kind()),
            content: text.to_string(),
            entities: self.entities(),
            created_at: msg.date,
        })
    }
}

impl TelegramMessageWrapper<'_> {
    fn chat_kind(&self) -> ChatKind {
        let chat = &self.0.chat;
        if chat.is_private() {
            ChatKind::Private
        } else if chat.is_supergroup() {
            ChatKind::Supergroup
        } else if chat.is_group() {
            ChatKind::Group
        } else {
            ChatKind::Channel
        }
    }

    /// Entities with the literal text they cover (Telegram offsets are UTF-16; teloxide resolves them).
    fn entities(&self) -> Vec<MessageEntity> {
        self.0
            .parse_entities()
            .unwrap_or_default()
            .into_iter()
            .map(|e| MessageEntity {
                kind: match e.kind() {
                    MessageEntityKind::Mention => EntityKind::Mention,
                    MessageEntityKind::BotCommand => EntityKind::BotCommand,
                    _ => EntityKind::Other,
                },
                text: e.text().to_string(),
            })
            .collect()
    }
}
