//! Pure functions for @-mention detection in group chats.
//!
//! Used by [`crate::dispatch::UpdateRouter`] to decide whether a group message is addressed to the
//! bot and to strip the mention before the text goes into the transcript.

use crate::core::{EntityKind, MessageEntity};

/// Returns true if `text` contains `@bot_username`.
#[inline]
pub fn is_bot_mentioned(text: &str, bot_username: &str) -> bool {
    text.contains(&mention_of(bot_username))
}

/// Removes every `@bot_username` occurrence from `text`. Surrounding whitespace is kept as is.
#[inline]
pub fn strip_mention(text: &str, bot_username: &str) -> String {
    text.replace(&mention_of(bot_username), "")
}

fn mention_of(bot_username: &str) -> String {
    format!("@{}", bot_username)
}

/// Group-chat filter. Returns the text to forward when the message mentions the bot, `None` when
/// the update should be dropped.
///
/// Only `mention` entities count; a mention entity whose literal text is exactly `@bot_username`
/// marks the message as addressed to the bot. Every `@bot_username` occurrence is then stripped
/// from the forwarded text.
pub fn filter_group_mention(
    text: &str,
    entities: &[MessageEntity],
    bot_username: &str,
) -> Option<String> {
    let mention = mention_of(bot_username);
    let mentioned = entities
        .iter()
        .any(|e| e.kind == EntityKind::Mention && e.text == mention);
    if !mentioned || !is_bot_mentioned(text, bot_username) {
        return None;
    }
    Some(strip_mention(text, bot_username))
}
