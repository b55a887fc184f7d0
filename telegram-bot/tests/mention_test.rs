//! Tests for the `mention` module (is_bot_mentioned, strip_mention, filter_group_mention).

use telegram_bot::mention::{filter_group_mention, is_bot_mentioned, strip_mention};
use telegram_bot::MessageEntity;

// --- is_bot_mentioned ---

/// **Test: is_bot_mentioned returns true when text contains @bot (any position).**
#[test]
fn is_bot_mentioned_contains_mention() {
    assert!(is_bot_mentioned("@dodobot hi", "dodobot"));
    assert!(is_bot_mentioned("hi @dodobot", "dodobot"));
    assert!(is_bot_mentioned("hi @dodobot!", "dodobot"));
}

/// **Test: is_bot_mentioned returns false for other handles and bare names.**
#[test]
fn is_bot_mentioned_no_mention() {
    assert!(!is_bot_mentioned("hi dodobot", "dodobot"));
    assert!(!is_bot_mentioned("hi @otherbot", "dodobot"));
    assert!(!is_bot_mentioned("", "dodobot"));
}

// --- strip_mention ---

/// **Test: strip_mention removes the handle only; no trimming.**
#[test]
fn strip_mention_leaves_whitespace() {
    assert_eq!(strip_mention("@dodobot hi", "dodobot"), " hi");
    assert_eq!(strip_mention("hi @dodobot", "dodobot"), "hi ");
    assert_eq!(strip_mention("no handle", "dodobot"), "no handle");
}

// --- filter_group_mention ---

/// **Test: literal group scenario: mention is removed, double space stays.**
#[test]
fn filter_forwards_stripped_text() {
    let entities = vec![MessageEntity::mention("@dodobot")];
    assert_eq!(
        filter_group_mention("hey @dodobot how are you", &entities, "dodobot"),
        Some("hey  how are you".to_string())
    );
}

/// **Test: forwarded text never contains the handle; dropped text never reaches the caller.**
#[test]
fn filter_output_never_contains_handle() {
    let cases = [
        ("@dodobot", vec!["@dodobot"]),
        ("@dodobot @dodobot twice", vec!["@dodobot", "@dodobot"]),
        ("hey @dodobot and @alice", vec!["@dodobot", "@alice"]),
        ("hey @alice", vec!["@alice"]),
        ("hey there", vec![]),
    ];

    for (text, mentions) in cases {
        let entities: Vec<MessageEntity> =
            mentions.into_iter().map(MessageEntity::mention).collect();
        match filter_group_mention(text, &entities, "dodobot") {
            Some(forwarded) => {
                assert!(text.contains("@dodobot"));
                assert!(!forwarded.contains("@dodobot"), "{:?}", forwarded);
            }
            None => assert!(
                !entities.iter().any(|e| e.text == "@dodobot"),
                "dropped {:?}",
                text
            ),
        }
    }
}

/// **Test: a longer handle that starts with the bot's name is not the bot.**
#[test]
fn filter_rejects_prefix_handles() {
    let entities = vec![MessageEntity::mention("@dodobot_fan")];
    assert_eq!(
        filter_group_mention("hi @dodobot_fan", &entities, "dodobot"),
        None
    );
}
