//! Error types for the bot core.
//!
//! [`DbotError`] is the top-level error. Each inbound update is its own failure domain: the
//! runner logs whatever a turn returns and moves on.

use std::time::Duration;
use thiserror::Error;

use crate::config::ConfigError;
use llm_client::CompletionError;

/// Top-level error for the bot (delivery, rate limit, completion, config, IO).
#[derive(Error, Debug)]
pub enum DbotError {
    /// Sending or editing on the messaging platform failed.
    #[error("Bot error: {0}")]
    Bot(String),

    /// The messaging platform asked us to wait before the next request.
    #[error("Retry after {}s", .0.as_secs())]
    RetryAfter(Duration),

    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DbotError {
    /// Wait requested by the platform, if this is a rate-limit error.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            DbotError::RetryAfter(d) => Some(*d),
            _ => None,
        }
    }
}

/// Result type for core operations; uses [`DbotError`].
pub type Result<T> = std::result::Result<T, DbotError>;
