//! # ChatGPT Telegram bridge
//!
//! Relays Telegram text messages to the OpenAI chat completion API and posts the replies back,
//! keeping a bounded per-user transcript for every chat.
//!
//! Core (Handler, Bot, Message), chain (HandlerChain), conversation (ConversationStore),
//! live_output (paced reply delivery), dispatch (UpdateRouter) and telegram (teloxide adapter,
//! long-polling runner).

pub mod chain;
pub mod components;
pub mod config;
pub mod conversation;
pub mod core;
pub mod dispatch;
pub mod handlers;
pub mod live_output;
pub mod mention;
pub mod runner;
pub mod telegram;

pub use crate::core::{
    init_tracing, parse_message_id, Bot, Chat, ChatKind, DbotError, EntityKind, Handler,
    HandlerResponse, Message, MessageEntity, Result, ToCoreMessage, ToCoreUser, User,
};

pub use chain::HandlerChain;
pub use components::{build_handler_chain, build_llm_client, BotComponents};
pub use config::{ConfigError, EnvConfig};
pub use conversation::{ConversationKey, ConversationStore};
pub use dispatch::{reply_target, UpdateQueues, UpdateRouter};
pub use handlers::{AuthHandler, ChatHandler, CommandHandler, LoggingHandler};
pub use live_output::LiveOutput;
pub use runner::run_bot;
pub use telegram::{run_polling, TelegramBotAdapter, TelegramMessageWrapper, TelegramUserWrapper};
