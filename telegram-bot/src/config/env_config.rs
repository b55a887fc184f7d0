//! [`EnvConfig`]: recognized keys, parsing, validation and `.env` serialization.

use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::conversation::DEFAULT_PROMPT;

pub const DEFAULT_EDIT_WAIT_SECONDS: u64 = 1;
pub const DEFAULT_LOG_FILE: &str = "bot.log";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
const TELEGRAM_ID: &str = "TELEGRAM_ID";
const EDIT_WAIT_SECONDS: &str = "EDIT_WAIT_SECONDS";
const PROMPT_INIT: &str = "PROMPT_INIT";
const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
const TELEGRAM_API_URL: &str = "TELEGRAM_API_URL";
const LOG_FILE: &str = "LOG_FILE";

const KEYS: [&str; 8] = [
    TELEGRAM_TOKEN,
    OPENAI_API_KEY,
    TELEGRAM_ID,
    EDIT_WAIT_SECONDS,
    PROMPT_INIT,
    OPENAI_BASE_URL,
    TELEGRAM_API_URL,
    LOG_FILE,
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is required but empty")]
    Missing(&'static str),

    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to read .env: {0}")]
    Dotenv(#[from] dotenvy::Error),
}

/// Runtime configuration. Loaded once at startup, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    /// TELEGRAM_TOKEN
    pub telegram_token: String,
    /// OPENAI_API_KEY
    pub openai_api_key: String,
    /// TELEGRAM_ID; empty allows everyone
    pub allowed_user_ids: Vec<i64>,
    /// EDIT_WAIT_SECONDS; minimum gap between edits of one message
    pub edit_wait_seconds: u64,
    /// PROMPT_INIT; empty until [`EnvConfig::validate_with_defaults`] fills in the default
    pub prompt_init: String,
    /// OPENAI_BASE_URL
    pub openai_base_url: String,
    /// TELEGRAM_API_URL; points the bot at another Bot API server
    pub telegram_api_url: Option<String>,
    /// LOG_FILE
    pub log_file: String,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            telegram_token: String::new(),
            openai_api_key: String::new(),
            allowed_user_ids: Vec::new(),
            edit_wait_seconds: DEFAULT_EDIT_WAIT_SECONDS,
            prompt_init: String::new(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            telegram_api_url: None,
            log_file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

impl EnvConfig {
    /// Reads `path` (a missing file counts as empty), then lets every recognized key that is set
    /// in the process environment override the file value. No validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut vars: HashMap<String, String> = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter.collect::<Result<_, _>>()?,
            Err(e) if e.not_found() => {
                debug!(path = %path.display(), "No .env file, using environment only");
                HashMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        for key in KEYS {
            if let Ok(value) = env::var(key) {
                vars.insert(key.to_string(), value);
            }
        }

        Self::from_vars(&vars)
    }

    /// Parses a key/value map. Unknown keys are ignored; absent or empty optional keys default.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| vars.get(key).map(|v| v.trim()).unwrap_or("");
        let non_empty = |key: &str| Some(get(key)).filter(|v| !v.is_empty());

        Ok(Self {
            telegram_token: get(TELEGRAM_TOKEN).to_string(),
            openai_api_key: get(OPENAI_API_KEY).to_string(),
            allowed_user_ids: parse_user_ids(get(TELEGRAM_ID))?,
            edit_wait_seconds: parse_edit_wait(get(EDIT_WAIT_SECONDS))?,
            prompt_init: vars.get(PROMPT_INIT).cloned().unwrap_or_default(),
            openai_base_url: non_empty(OPENAI_BASE_URL)
                .unwrap_or(DEFAULT_OPENAI_BASE_URL)
                .to_string(),
            telegram_api_url: non_empty(TELEGRAM_API_URL).map(str::to_string),
            log_file: non_empty(LOG_FILE).unwrap_or(DEFAULT_LOG_FILE).to_string(),
        })
    }

    /// Parses `.env` text (as written by [`EnvConfig::to_dotenv`]).
    pub fn from_dotenv_str(content: &str) -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> =
            dotenvy::from_read_iter(content.as_bytes()).collect::<Result<_, _>>()?;
        Self::from_vars(&vars)
    }

    /// Serializes every key as a double-quoted `.env` line.
    pub fn to_dotenv(&self) -> String {
        let ids = self
            .allowed_user_ids
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let mut lines = vec![
            dotenv_line(TELEGRAM_TOKEN, &self.telegram_token),
            dotenv_line(OPENAI_API_KEY, &self.openai_api_key),
            dotenv_line(TELEGRAM_ID, &ids),
            dotenv_line(EDIT_WAIT_SECONDS, &self.edit_wait_seconds.to_string()),
            dotenv_line(PROMPT_INIT, &self.prompt_init),
            dotenv_line(OPENAI_BASE_URL, &self.openai_base_url),
        ];
        if let Some(ref url) = self.telegram_api_url {
            lines.push(dotenv_line(TELEGRAM_API_URL, url));
        }
        lines.push(dotenv_line(LOG_FILE, &self.log_file));
        lines.join("\n") + "\n"
    }

    /// Checks required keys and URLs; an empty prompt becomes the built-in default.
    pub fn validate_with_defaults(mut self) -> Result<Self, ConfigError> {
        if self.telegram_token.is_empty() {
            return Err(ConfigError::Missing(TELEGRAM_TOKEN));
        }
        if self.openai_api_key.is_empty() {
            return Err(ConfigError::Missing(OPENAI_API_KEY));
        }
        if self.prompt_init.is_empty() {
            self.prompt_init = DEFAULT_PROMPT.to_string();
        }
        check_url(OPENAI_BASE_URL, &self.openai_base_url)?;
        if let Some(ref url) = self.telegram_api_url {
            check_url(TELEGRAM_API_URL, url)?;
        }
        Ok(self)
    }

    /// True when the allow-list is empty or contains `user_id`.
    pub fn is_allowed(&self, user_id: i64) -> bool {
        self.allowed_user_ids.is_empty() || self.allowed_user_ids.contains(&user_id)
    }

    pub fn edit_wait(&self) -> Duration {
        Duration::from_secs(self.edit_wait_seconds)
    }
}

fn parse_user_ids(raw: &str) -> Result<Vec<i64>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>().map_err(|e| ConfigError::Invalid {
                key: TELEGRAM_ID,
                value: s.to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}

fn parse_edit_wait(raw: &str) -> Result<u64, ConfigError> {
    if raw.is_empty() {
        return Ok(DEFAULT_EDIT_WAIT_SECONDS);
    }
    raw.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
        key: EDIT_WAIT_SECONDS,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn check_url(key: &'static str, value: &str) -> Result<(), ConfigError> {
    reqwest::Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn dotenv_line(key: &str, value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '$' => escaped.push_str("\\$"),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    format!("{}=\"{}\"", key, escaped)
}
