//! Shared test doubles and message builders.
#![allow(dead_code)]

pub mod mock_bot;
pub mod mock_llm;

use chrono::Utc;
use std::sync::Arc;
use telegram_bot::{
    build_handler_chain, BotComponents, Chat, ChatKind, EnvConfig, Message, MessageEntity,
    UpdateRouter, User,
};

pub use mock_bot::{BotCall, EditFailure, MockBot};
pub use mock_llm::MockLlm;

pub const BOT_USERNAME: &str = "dodobot";

/// Text message from `user_id` in `chat`.
pub fn text_message(id: &str, user_id: i64, chat: Chat, text: &str) -> Message {
    Message {
        id: id.to_string(),
        user: User::with_id(user_id),
        chat,
        content: text.to_string(),
        entities: Vec::new(),
        created_at: Utc::now(),
    }
}

/// Private-chat message: chat id equals the user id.
pub fn private_message(user_id: i64, text: &str) -> Message {
    text_message("1", user_id, Chat::private(user_id), text)
}

/// Supergroup message with one mention entity per `@handle` in `mentions`.
pub fn group_message(chat_id: i64, user_id: i64, text: &str, mentions: &[&str]) -> Message {
    let mut msg = text_message("55", user_id, Chat::new(chat_id, ChatKind::Supergroup), text);
    msg.entities = mentions.iter().map(|m| MessageEntity::mention(*m)).collect();
    msg
}

/// Router wired like production but with mock Bot and LLM.
pub struct Harness {
    pub bot: Arc<MockBot>,
    pub llm: Arc<MockLlm>,
    pub components: BotComponents,
    pub router: UpdateRouter,
}

impl Harness {
    pub fn new(config: EnvConfig) -> Self {
        let bot = Arc::new(MockBot::new());
        let llm = Arc::new(MockLlm::new());
        let components = BotComponents::new(&config, bot.clone(), llm.clone());
        let chain = build_handler_chain(&config, &components);
        let router = UpdateRouter::new(BOT_USERNAME, chain);
        Self {
            bot,
            llm,
            components,
            router,
        }
    }

    /// Open allow-list, given prompt, no pacing waits.
    pub fn with_prompt(prompt: &str) -> Self {
        Self::new(EnvConfig {
            telegram_token: "t".into(),
            openai_api_key: "k".into(),
            prompt_init: prompt.into(),
            edit_wait_seconds: 0,
            ..EnvConfig::default()
        })
    }
}
