//! Bot configuration: `.env` file merged with process environment.

mod env_config;


pub use env_config::{
    ConfigError, EnvConfig, DEFAULT_EDIT_WAIT_SECONDS, DEFAULT_LOG_FILE, DEFAULT_OPENAI_BASE_URL,
};
