//! Mock implementation of [`telegram_bot::Bot`] for integration tests.
//!
//! Records every send, edit and typing call with the (tokio) instant it happened, so tests can
//! assert on texts, reply targets and edit spacing without hitting Telegram.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use telegram_bot::{Bot, Chat, DbotError, Result};
use tokio::time::Instant;

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCall {
    Send {
        chat_id: i64,
        reply_to: Option<String>,
        text: String,
        message_id: String,
    },
    Edit {
        chat_id: i64,
        message_id: String,
        text: String,
    },
    Typing {
        chat_id: i64,
    },
}

/// Scripted failure for the next edit.
#[derive(Debug, Clone, Copy)]
pub enum EditFailure {
    RetryAfter(Duration),
    Other,
}

/// Mock Bot that numbers sent messages from 100 and records every call.
pub struct MockBot {
    calls: Mutex<Vec<(Instant, BotCall)>>,
    next_id: AtomicI32,
    edit_failures: Mutex<VecDeque<EditFailure>>,
    typing_delays: Mutex<VecDeque<Duration>>,
}

impl Default for MockBot {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_id: AtomicI32::new(100),
            edit_failures: Mutex::new(VecDeque::new()),
            typing_delays: Mutex::new(VecDeque::new()),
        }
    }
}

impl MockBot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next edits fail in order with the given failures; later edits succeed.
    pub fn fail_next_edits(&self, failures: impl IntoIterator<Item = EditFailure>) {
        self.edit_failures.lock().unwrap().extend(failures);
    }

    /// The next typing calls take this long to return, in order; later ones return at once.
    pub fn delay_next_typing(&self, delays: impl IntoIterator<Item = Duration>) {
        self.typing_delays.lock().unwrap().extend(delays);
    }

    pub fn calls(&self) -> Vec<BotCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, c)| c.clone())
            .collect()
    }

    /// `(reply_to, text)` of every send, in order.
    pub fn sends(&self) -> Vec<(Option<String>, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BotCall::Send { reply_to, text, .. } => Some((reply_to, text)),
                _ => None,
            })
            .collect()
    }

    /// Text of every edit attempt (failed ones included), in order.
    pub fn edits(&self) -> Vec<String> {
        self.timed_edits().into_iter().map(|(_, t)| t).collect()
    }

    /// Edit attempts with the instant they were issued.
    pub fn timed_edits(&self) -> Vec<(Instant, String)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(at, c)| match c {
                BotCall::Edit { text, .. } => Some((*at, text.clone())),
                _ => None,
            })
            .collect()
    }

    /// Instant of the first send (the placeholder, for paced replies).
    pub fn first_send_at(&self) -> Option<Instant> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(_, c)| matches!(c, BotCall::Send { .. }))
            .map(|(at, _)| *at)
    }

    pub fn typing_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, BotCall::Typing { .. }))
            .count()
    }

    fn record(&self, call: BotCall) {
        self.calls.lock().unwrap().push((Instant::now(), call));
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, reply_to: Option<&str>, text: &str) -> Result<String> {
        let message_id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        self.record(BotCall::Send {
            chat_id: chat.id,
            reply_to: reply_to.map(str::to_string),
            text: text.to_string(),
            message_id: message_id.clone(),
        });
        Ok(message_id)
    }

    async fn edit_message(&self, chat: &Chat, message_id: &str, text: &str) -> Result<()> {
        self.record(BotCall::Edit {
            chat_id: chat.id,
            message_id: message_id.to_string(),
            text: text.to_string(),
        });
        match self.edit_failures.lock().unwrap().pop_front() {
            Some(EditFailure::RetryAfter(d)) => Err(DbotError::RetryAfter(d)),
            Some(EditFailure::Other) => Err(DbotError::Bot("Bad Request: boom".into())),
            None => Ok(()),
        }
    }

    async fn send_typing(&self, chat: &Chat) -> Result<()> {
        self.record(BotCall::Typing { chat_id: chat.id });
        let delay = self.typing_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }
}
