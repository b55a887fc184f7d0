//! In-memory conversation store.

use dashmap::DashMap;
use prompt::{ChatMessage, MessageRole, TokenUsage};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::ConversationKey;

/// Upper bound on transcript length after any append.
pub const MAX_TRANSCRIPT_LEN: usize = 13;
/// Number of most recent non-prefix messages kept when the bound is exceeded.
pub const WINDOW_LEN: usize = MAX_TRANSCRIPT_LEN - 1;

/// Prompt prefix used when neither the caller nor the config provides one.
pub const DEFAULT_PROMPT: &str =
    "You are a helpful assistant. Answer concisely in plain text suitable for a Telegram chat.";

/// One conversation: transcript plus the tokens it has consumed since its last reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub key: ConversationKey,
    pub messages: Vec<ChatMessage>,
    pub usage: TokenUsage,
}

impl Conversation {
    fn new(key: ConversationKey, prefix: &str) -> Self {
        Self {
            key,
            messages: vec![ChatMessage::system(prefix)],
            usage: TokenUsage::default(),
        }
    }

    /// Appends and slides the window: `[messages[0]] ++ last WINDOW_LEN` once over the bound.
    fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        let len = self.messages.len();
        if len > MAX_TRANSCRIPT_LEN {
            self.messages.drain(1..len - WINDOW_LEN);
        }
    }
}

/// Process-wide token counters.
#[derive(Debug, Default)]
struct UsageTotals {
    prompt_tokens: AtomicU64,
    completion_tokens: AtomicU64,
    total_tokens: AtomicU64,
}

impl UsageTotals {
    fn add(&self, usage: &TokenUsage) {
        saturating_fetch_add(&self.prompt_tokens, usage.prompt_tokens);
        saturating_fetch_add(&self.completion_tokens, usage.completion_tokens);
        saturating_fetch_add(&self.total_tokens, usage.total_tokens);
    }

    fn snapshot(&self) -> TokenUsage {
        TokenUsage::new(
            self.prompt_tokens.load(Ordering::Relaxed),
            self.completion_tokens.load(Ordering::Relaxed),
            self.total_tokens.load(Ordering::Relaxed),
        )
    }
}

fn saturating_fetch_add(counter: &AtomicU64, delta: u64) {
    let _ = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
        Some(v.saturating_add(delta))
    });
}

/// Holds all conversations. Individual operations are atomic per key; callers that need a whole
/// turn (append → complete → append → add usage) to be linearizable hold [`ConversationStore::turn_lock`].
#[derive(Debug)]
pub struct ConversationStore {
    conversations: DashMap<ConversationKey, Conversation>,
    turn_locks: DashMap<ConversationKey, Arc<Mutex<()>>>,
    totals: UsageTotals,
    default_prompt: String,
}

impl ConversationStore {
    /// `default_prompt` is the prefix for lazily created conversations and for resets with an empty prefix.
    /// An empty value falls back to [`DEFAULT_PROMPT`].
    pub fn new(default_prompt: impl Into<String>) -> Self {
        let default_prompt = default_prompt.into();
        let default_prompt = if default_prompt.is_empty() {
            DEFAULT_PROMPT.to_string()
        } else {
            default_prompt
        };
        Self {
            conversations: DashMap::new(),
            turn_locks: DashMap::new(),
            totals: UsageTotals::default(),
            default_prompt,
        }
    }

    pub fn default_prompt(&self) -> &str {
        &self.default_prompt
    }

    /// Mutex serializing turns for `key`. Lock it (e.g. `lock_owned().await`) for the duration of a turn or reset.
    pub fn turn_lock(&self, key: &ConversationKey) -> Arc<Mutex<()>> {
        self.turn_locks
            .entry(*key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Replaces any existing conversation for `key` with `[system(prefix)]` and zeroed counters.
    /// An empty `prefix` uses the default prompt.
    pub fn reset(&self, key: &ConversationKey, prefix: &str) {
        let prefix = if prefix.is_empty() {
            self.default_prompt.as_str()
        } else {
            prefix
        };
        self.conversations
            .insert(*key, Conversation::new(*key, prefix));
        info!(key = %key, prefix_len = prefix.len(), "Conversation reset");
    }

    /// Appends a message (creating the conversation with the default prompt if needed), applies the
    /// window and returns the resulting transcript.
    pub fn append(&self, key: &ConversationKey, role: MessageRole, content: &str) -> Vec<ChatMessage> {
        let mut conversation = self
            .conversations
            .entry(*key)
            .or_insert_with(|| {
                info!(key = %key, "Conversation created with default prompt");
                Conversation::new(*key, &self.default_prompt)
            });
        conversation.push(ChatMessage::new(role, content));
        debug!(key = %key, role = %role, len = conversation.messages.len(), "Message appended");
        conversation.messages.clone()
    }

    /// Adds `delta` to the conversation's counters (if it exists) and to the process-wide totals.
    pub fn add_usage(&self, key: &ConversationKey, delta: &TokenUsage) {
        if let Some(mut conversation) = self.conversations.get_mut(key) {
            conversation.usage.accumulate(delta);
        }
        self.totals.add(delta);
    }

    /// Snapshot of one conversation.
    pub fn get(&self, key: &ConversationKey) -> Option<Conversation> {
        self.conversations.get(key).map(|c| c.clone())
    }

    pub fn transcript(&self, key: &ConversationKey) -> Option<Vec<ChatMessage>> {
        self.conversations.get(key).map(|c| c.messages.clone())
    }

    pub fn usage(&self, key: &ConversationKey) -> Option<TokenUsage> {
        self.conversations.get(key).map(|c| c.usage)
    }

    /// Tokens consumed by the whole process since start.
    pub fn total_usage(&self) -> TokenUsage {
        self.totals.snapshot()
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(DEFAULT_PROMPT)
    }
}
