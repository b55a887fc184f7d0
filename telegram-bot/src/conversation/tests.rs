//! Conversation store tests: prompt prefix, window bound, window content, usage counters.

use super::*;
use prompt::{ChatMessage, MessageRole, TokenUsage};
use std::sync::Arc;

fn key() -> ConversationKey {
    ConversationKey::new(7, 7)
}

/// Fills a conversation to exactly 13 messages: system + 6 user/assistant pairs.
fn full_store() -> ConversationStore {
    let store = ConversationStore::new("prefix");
    store.reset(&key(), "prefix");
    for i in 0..6 {
        store.append(&key(), MessageRole::User, &format!("u{}", i));
        store.append(&key(), MessageRole::Assistant, &format!("a{}", i));
    }
    store
}

#[test]
fn key_renders_as_chat_colon_user() {
    assert_eq!(ConversationKey::new(-100123, 42).to_string(), "-100123:42");
    assert_eq!(key().to_string(), "7:7");
}

#[test]
fn append_creates_conversation_with_default_prompt() {
    let store = ConversationStore::new("hello");
    let transcript = store.append(&key(), MessageRole::User, "Hi");
    assert_eq!(
        transcript,
        vec![ChatMessage::system("hello"), ChatMessage::user("Hi")]
    );
    assert_eq!(store.usage(&key()), Some(TokenUsage::default()));
}

#[test]
fn empty_default_prompt_falls_back_to_builtin() {
    let store = ConversationStore::new("");
    assert_eq!(store.default_prompt(), DEFAULT_PROMPT);
    let transcript = store.append(&key(), MessageRole::User, "Hi");
    assert_eq!(transcript[0], ChatMessage::system(DEFAULT_PROMPT));
}

#[test]
fn reset_replaces_transcript_and_zeroes_usage() {
    let store = ConversationStore::new("hello");
    store.append(&key(), MessageRole::User, "Hi");
    store.add_usage(&key(), &TokenUsage::new(1, 2, 3));

    store.reset(&key(), "freshprompt");

    assert_eq!(
        store.transcript(&key()),
        Some(vec![ChatMessage::system("freshprompt")])
    );
    assert_eq!(store.usage(&key()), Some(TokenUsage::default()));
    assert_eq!(store.total_usage(), TokenUsage::new(1, 2, 3));
}

#[test]
fn reset_with_empty_prefix_uses_default() {
    let store = ConversationStore::new("hello");
    store.reset(&key(), "");
    assert_eq!(store.transcript(&key()), Some(vec![ChatMessage::system("hello")]));
}

#[test]
fn window_slides_at_thirteen() {
    let store = full_store();
    let before = store.transcript(&key()).unwrap();
    assert_eq!(before.len(), MAX_TRANSCRIPT_LEN);

    let after = store.append(&key(), MessageRole::User, "x");

    assert_eq!(after.len(), MAX_TRANSCRIPT_LEN);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[12], ChatMessage::user("x"));
    // the former index 1 ("u0") is gone; everything else shifted left by one
    assert_eq!(after[1], ChatMessage::assistant("a0"));
    assert_eq!(&after[1..12], &before[2..13]);
}

#[test]
fn window_keeps_prefix_and_most_recent_twelve() {
    let store = ConversationStore::new("p");
    let mut appended = Vec::new();
    for i in 0..40 {
        let role = if i % 2 == 0 {
            MessageRole::User
        } else {
            MessageRole::Assistant
        };
        let content = format!("m{}", i);
        appended.push(ChatMessage::new(role, content.clone()));
        let transcript = store.append(&key(), role, &content);

        assert!(!transcript.is_empty() && transcript.len() <= MAX_TRANSCRIPT_LEN);
        assert_eq!(transcript[0], ChatMessage::system("p"));
        assert_eq!(
            transcript
                .iter()
                .filter(|m| m.role == MessageRole::System)
                .count(),
            1
        );
        let tail_start = appended.len().saturating_sub(WINDOW_LEN);
        assert_eq!(&transcript[1..], &appended[tail_start..]);
    }
}

#[test]
fn prefix_survives_sliding_after_reset() {
    let store = ConversationStore::new("default");
    store.reset(&key(), "custom");
    for i in 0..30 {
        let transcript = store.append(&key(), MessageRole::User, &i.to_string());
        assert_eq!(transcript[0], ChatMessage::system("custom"));
    }
}

#[test]
fn add_usage_accumulates_per_conversation_and_globally() {
    let store = ConversationStore::new("p");
    let other = ConversationKey::new(1, 2);
    store.append(&key(), MessageRole::User, "a");
    store.append(&other, MessageRole::User, "b");

    store.add_usage(&key(), &TokenUsage::new(10, 5, 15));
    store.add_usage(&key(), &TokenUsage::new(1, 1, 2));
    store.add_usage(&other, &TokenUsage::new(3, 0, 3));

    assert_eq!(store.usage(&key()), Some(TokenUsage::new(11, 6, 17)));
    assert_eq!(store.usage(&other), Some(TokenUsage::new(3, 0, 3)));
    assert_eq!(store.total_usage(), TokenUsage::new(14, 6, 20));
}

#[test]
fn add_usage_without_conversation_updates_only_totals() {
    let store = ConversationStore::new("p");
    store.add_usage(&key(), &TokenUsage::new(1, 1, 2));
    assert!(store.get(&key()).is_none());
    assert!(store.is_empty());
    assert_eq!(store.total_usage(), TokenUsage::new(1, 1, 2));
}

#[test]
fn group_members_have_separate_conversations() {
    let store = ConversationStore::new("p");
    store.append(&ConversationKey::new(-5, 1), MessageRole::User, "from one");
    store.append(&ConversationKey::new(-5, 2), MessageRole::User, "from two");
    assert_eq!(store.len(), 2);
    assert_eq!(
        store.transcript(&ConversationKey::new(-5, 1)).unwrap()[1],
        ChatMessage::user("from one")
    );
}

#[test]
fn turn_lock_is_shared_per_key() {
    let store = ConversationStore::new("p");
    let a = store.turn_lock(&key());
    let b = store.turn_lock(&key());
    let c = store.turn_lock(&ConversationKey::new(1, 1));
    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
}

/// **Test: concurrent appends to one key under the turn lock never break the invariants.**
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_turns_keep_invariants() {
    let store = Arc::new(ConversationStore::new("p"));
    let mut tasks = Vec::new();
    for i in 0..32 {
        let store = store.clone();
        tasks.push(tokio::spawn(async move {
            let lock = store.turn_lock(&key());
            let _turn = lock.lock_owned().await;
            store.append(&key(), MessageRole::User, &format!("q{}", i));
            tokio::task::yield_now().await;
            store.append(&key(), MessageRole::Assistant, &format!("r{}", i));
            store.add_usage(&key(), &TokenUsage::new(1, 1, 2));
        }));
    }
    for t in tasks {
        t.await.unwrap();
    }

    let transcript = store.transcript(&key()).unwrap();
    assert_eq!(transcript.len(), MAX_TRANSCRIPT_LEN);
    assert_eq!(transcript[0], ChatMessage::system("p"));
    // turns never interleave: user and assistant strictly alternate with matching numbers
    for pair in transcript[1..].chunks(2) {
        if let [q, r] = pair {
            assert_eq!(q.role, MessageRole::User);
            assert_eq!(r.role, MessageRole::Assistant);
            assert_eq!(q.content[1..], r.content[1..]);
        }
    }
    assert_eq!(store.total_usage(), TokenUsage::new(32, 32, 64));
}
