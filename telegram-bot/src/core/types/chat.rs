//! Chat identity type for core messages.

use serde::{Deserialize, Serialize};

/// Kind of chat an update arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    /// Group or supergroup: the bot only answers when mentioned.
    pub fn is_group_like(&self) -> bool {
        matches!(self, ChatKind::Group | ChatKind::Supergroup)
    }
}

/// Chat (channel, group or private) identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub kind: ChatKind,
}

impl Chat {
    pub fn new(id: i64, kind: ChatKind) -> Self {
        Self { id, kind }
    }

    pub fn private(id: i64) -> Self {
        Self::new(id, ChatKind::Private)
    }
}
