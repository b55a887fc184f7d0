//! Conversation memory: per-`chat:user` transcripts with a bounded window and token counters.
//!
//! [`ConversationStore`] owns every [`Conversation`]. Transcripts always start with the single
//! system message (the prompt prefix) and hold at most [`MAX_TRANSCRIPT_LEN`] messages.

mod key;
mod store;

#[cfg(test)]
mod tests;

pub use key::ConversationKey;
pub use store::{Conversation, ConversationStore, DEFAULT_PROMPT, MAX_TRANSCRIPT_LEN, WINDOW_LEN};
