//! Core types: user, chat, message, handler response, and Handler trait.
//!
//! Types are split into one file per main type for easier navigation.

mod chat;
mod handler;
mod message;
mod response;
mod user;

pub use chat::{Chat, ChatKind};
pub use handler::{Handler, ToCoreMessage, ToCoreUser};
pub use message::{EntityKind, Message, MessageEntity};
pub use response::HandlerResponse;
pub use user::User;
