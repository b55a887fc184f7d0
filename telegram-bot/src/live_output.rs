//! Live output: publishes a finished reply as one Telegram message revealed by paced edits.
//!
//! The completion arrives whole, so the edits only simulate streaming. What matters is the edit
//! budget: consecutive edits of one message are at least `min_interval` apart, rate-limit answers
//! push the next edit further out, and the final edit always carries the full text.
//!
//! # Entry points
//!
//! - **[`LiveOutput::deliver`]** – send placeholder, reveal prefixes, finish with the full text.
//! - **[`split_message`]** – cuts text into Telegram-sized parts on character boundaries.
//! - **[`reveal_boundaries`]** – byte offsets of the intermediate prefixes for one part.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, instrument, warn};

use crate::core::{Bot, Chat, Result};

/// Text of the holding message sent before the first edit.
pub const PLACEHOLDER_TEXT: &str = "…";
/// Sent instead of an empty reply; Telegram rejects empty messages.
pub const EMPTY_REPLY_TEXT: &str = "(empty reply)";
/// Telegram's limit for one text message.
pub const TELEGRAM_MAX_MESSAGE_CHARS: usize = 4096;

// ---------- Tuning constants ----------

/// Parts up to this many characters are sent once, without placeholder or edits.
const DEFAULT_SHORT_REPLY_CHARS: usize = 200;
/// Characters revealed per intermediate edit.
const DEFAULT_CHUNK_CHARS: usize = 160;
/// Upper bound on intermediate edits per message; longer parts reveal bigger chunks.
const MAX_INTERMEDIATE_EDITS: usize = 8;
/// Attempts for the final full-text edit before giving up.
const MAX_FINAL_EDIT_ATTEMPTS: usize = 5;

type BotRef = Arc<dyn Bot>;

/// Identifies which Telegram message we are editing; bundles bot, chat, and message ID.
struct EditTarget<'a> {
    bot: &'a BotRef,
    chat: &'a Chat,
    message_id: &'a str,
}

impl EditTarget<'_> {
    async fn edit(&self, text: &str) -> Result<()> {
        self.bot.edit_message(self.chat, self.message_id, text).await
    }
}

/// Earliest instant the next edit of one message may be issued.
struct EditPacer {
    min_interval: Duration,
    next_allowed: Instant,
}

impl EditPacer {
    /// The placeholder send counts as the first write to the message.
    fn after_send(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_allowed: Instant::now() + min_interval,
        }
    }

    async fn wait_turn(&self) {
        tokio::time::sleep_until(self.next_allowed).await;
    }

    fn edited(&mut self) {
        self.next_allowed = Instant::now() + self.min_interval;
    }

    fn back_off(&mut self, retry_after: Duration) {
        self.next_allowed = Instant::now() + retry_after.max(self.min_interval);
    }
}

/// Splits `text` into consecutive parts of at most `max_chars` characters.
pub fn split_message(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut parts = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let cut = rest
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        parts.push(&rest[..cut]);
        rest = &rest[cut..];
    }
    parts
}

/// Byte offsets at which `text` is cut for intermediate edits, strictly increasing and strictly
/// less than `text.len()`. The full text is not included; it is always the final edit.
pub fn reveal_boundaries(text: &str, chunk_chars: usize) -> Vec<usize> {
    let total_chars = text.chars().count();
    let step = chunk_chars
        .max(1)
        .max(total_chars.div_ceil(MAX_INTERMEDIATE_EDITS + 1));
    text.char_indices()
        .map(|(i, _)| i)
        .enumerate()
        .filter(|(n, _)| *n > 0 && n % step == 0)
        .map(|(_, i)| i)
        .collect()
}

/// Paced delivery of replies through a [`Bot`].
#[derive(Clone)]
pub struct LiveOutput {
    bot: BotRef,
    min_interval: Duration,
    short_reply_chars: usize,
    chunk_chars: usize,
}

impl LiveOutput {
    /// `min_interval` is the minimum wall-clock gap between two writes to the same message.
    pub fn new(bot: BotRef, min_interval: Duration) -> Self {
        Self {
            bot,
            min_interval,
            short_reply_chars: DEFAULT_SHORT_REPLY_CHARS,
            chunk_chars: DEFAULT_CHUNK_CHARS,
        }
    }

    pub fn with_short_reply_chars(mut self, chars: usize) -> Self {
        self.short_reply_chars = chars;
        self
    }

    pub fn with_chunk_chars(mut self, chars: usize) -> Self {
        self.chunk_chars = chars.max(1);
        self
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// **Entry point.** Delivers `text` to `chat`, the first message replying to `reply_to`.
    ///
    /// Errors are delivery errors (placeholder send failed, or the final edit failed after retries).
    #[instrument(skip(self, text), fields(chat_id = chat.id, text_len = text.len()))]
    pub async fn deliver(&self, chat: &Chat, reply_to: Option<&str>, text: &str) -> Result<()> {
        if text.is_empty() {
            self.bot.send_message(chat, reply_to, EMPTY_REPLY_TEXT).await?;
            return Ok(());
        }

        for (i, part) in split_message(text, TELEGRAM_MAX_MESSAGE_CHARS)
            .into_iter()
            .enumerate()
        {
            let reply_to = if i == 0 { reply_to } else { None };
            self.deliver_part(chat, reply_to, part).await?;
        }
        Ok(())
    }

    async fn deliver_part(&self, chat: &Chat, reply_to: Option<&str>, part: &str) -> Result<()> {
        if part.chars().count() <= self.short_reply_chars {
            self.bot.send_message(chat, reply_to, part).await?;
            return Ok(());
        }

        let message_id = self
            .bot
            .send_message(chat, reply_to, PLACEHOLDER_TEXT)
            .await?;
        let target = EditTarget {
            bot: &self.bot,
            chat,
            message_id: &message_id,
        };
        let mut pacer = EditPacer::after_send(self.min_interval);

        for end in reveal_boundaries(part, self.chunk_chars) {
            pacer.wait_turn().await;
            match target.edit(&part[..end]).await {
                Ok(()) => {
                    debug!(message_id = %message_id, revealed = end, "Intermediate edit");
                    pacer.edited();
                }
                Err(e) => match e.retry_after() {
                    Some(wait) => {
                        warn!(message_id = %message_id, retry_after_secs = wait.as_secs(), "Edit rate limited, skipping to next boundary");
                        pacer.back_off(wait);
                    }
                    None => {
                        warn!(message_id = %message_id, error = %e, "Intermediate edit failed");
                        pacer.edited();
                    }
                },
            }
        }

        self.final_edit(&target, part, &mut pacer).await
    }

    /// The full text must land; retries on rate limit and transient failures.
    async fn final_edit(
        &self,
        target: &EditTarget<'_>,
        text: &str,
        pacer: &mut EditPacer,
    ) -> Result<()> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            pacer.wait_turn().await;
            match target.edit(text).await {
                Ok(()) => {
                    pacer.edited();
                    return Ok(());
                }
                Err(e) if attempt >= MAX_FINAL_EDIT_ATTEMPTS => {
                    error!(message_id = %target.message_id, error = %e, attempts = attempt, "Final edit failed");
                    return Err(e);
                }
                Err(e) => {
                    warn!(message_id = %target.message_id, error = %e, attempt, "Final edit failed, retrying");
                    match e.retry_after() {
                        Some(wait) => pacer.back_off(wait),
                        None => pacer.edited(),
                    }
                }
            }
        }
    }
}
