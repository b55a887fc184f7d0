//! Handler implementations: logging, allow-list auth, commands, chat turns.

mod chat;
mod command;
mod logging_auth;

pub use chat::{with_cost_footnote, ChatHandler};
pub use command::{parse_command, Command, CommandHandler, HELP_TEXT, RELOAD_ACK_TEXT, UNKNOWN_COMMAND_TEXT};
pub use logging_auth::{AuthHandler, LoggingHandler, DENIED_TEXT};
