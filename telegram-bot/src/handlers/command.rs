//! Slash commands: `/help`, `/start`, `/reload [prompt]`, everything else is unknown.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, instrument};

use crate::conversation::ConversationStore;
use crate::core::{Bot, Handler, HandlerResponse, Message, Result};
use crate::dispatch::reply_target;

pub const HELP_TEXT: &str = "Send a message to start talking with ChatGPT. You can use /reload at any point to clear the conversation history and start from scratch (don't worry, it won't delete the Telegram messages).";
pub const RELOAD_ACK_TEXT: &str = "Started a new conversation. Enjoy!";
pub const UNKNOWN_COMMAND_TEXT: &str = "Unknown command. Send /help to see a list of commands.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Start,
    /// Arguments become the new system prompt; empty means the default prompt.
    Reload(String),
    Unknown(String),
}

/// Parses `/name[@bot] [args]`. `None` when `text` is not a command.
pub fn parse_command(text: &str) -> Option<Command> {
    let rest = text.strip_prefix('/')?;
    let (head, args) = match rest.split_once(char::is_whitespace) {
        Some((head, args)) => (head, args.trim()),
        None => (rest, ""),
    };
    let name = head.split_once('@').map_or(head, |(name, _)| name);

    Some(match name {
        "help" => Command::Help,
        "start" => Command::Start,
        "reload" => Command::Reload(args.to_string()),
        other => Command::Unknown(other.to_string()),
    })
}

/// Answers commands and ends the handle phase with `Reply`; non-commands pass through.
pub struct CommandHandler {
    bot: Arc<dyn Bot>,
    store: Arc<ConversationStore>,
}

impl CommandHandler {
    pub fn new(bot: Arc<dyn Bot>, store: Arc<ConversationStore>) -> Self {
        Self { bot, store }
    }

    async fn reload(&self, message: &Message, prompt: &str) {
        let key = message.conversation_key();
        let lock = self.store.turn_lock(&key);
        let _turn = lock.lock().await;
        self.store.reset(&key, prompt);
        info!(conversation_key = %key, custom_prompt = !prompt.is_empty(), "Conversation reset");
    }
}

#[async_trait]
impl Handler for CommandHandler {
    #[instrument(skip(self, message), fields(conversation_key = %message.conversation_key()))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let Some(command) = parse_command(&message.content) else {
            return Ok(HandlerResponse::Continue);
        };

        let text = match command {
            Command::Help | Command::Start => HELP_TEXT,
            Command::Reload(prompt) => {
                self.reload(message, &prompt).await;
                RELOAD_ACK_TEXT
            }
            Command::Unknown(name) => {
                info!(command = %name, "Unknown command");
                UNKNOWN_COMMAND_TEXT
            }
        };

        self.bot
            .send_message(&message.chat, reply_target(message), text)
            .await
            .map_err(|e| {
                error!(error = %e, "Error sending message");
                e
            })?;
        Ok(HandlerResponse::Reply(text.to_string()))
    }
}
