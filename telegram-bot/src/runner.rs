//! Process-level wiring: logging, Telegram client, components, long polling.

use anyhow::{Context, Result};
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{info, instrument};

use crate::components::{build_handler_chain, build_llm_client, BotComponents};
use crate::config::EnvConfig;
use crate::core::init_tracing;
use crate::dispatch::{UpdateQueues, UpdateRouter};
use crate::telegram::{run_polling, TelegramBotAdapter};

/// Creates the teloxide client, pointed at `TELEGRAM_API_URL` when set.
fn build_teloxide_bot(config: &EnvConfig) -> Result<teloxide::Bot> {
    let bot = teloxide::Bot::new(config.telegram_token.clone());
    match config.telegram_api_url {
        Some(ref url_str) => {
            let url = reqwest::Url::parse(url_str)
                .with_context(|| format!("Invalid TELEGRAM_API_URL: {}", url_str))?;
            Ok(bot.set_api_url(url))
        }
        None => Ok(bot),
    }
}

/// Main entry: init logging, fetch the bot identity, build components and chain, then poll until shutdown.
/// Expects an already validated config.
#[instrument(skip(config))]
pub async fn run_bot(config: EnvConfig) -> Result<()> {
    let _log_guard = init_tracing(&config.log_file)?;

    info!(
        allow_list_len = config.allowed_user_ids.len(),
        edit_wait_seconds = config.edit_wait_seconds,
        log_file = %config.log_file,
        "Initializing bot"
    );

    let teloxide_bot = build_teloxide_bot(&config)?;
    let me = teloxide_bot
        .get_me()
        .await
        .context("Failed to fetch bot identity (getMe)")?;
    let bot_username = me.user.username.clone().unwrap_or_default();
    info!(username = %bot_username, "Started Telegram bot! Message @{} to start.", bot_username);

    let bot_adapter = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    let components = BotComponents::new(&config, bot_adapter, build_llm_client(&config));
    let chain = build_handler_chain(&config, &components);
    let router = Arc::new(UpdateRouter::new(bot_username, chain));
    let queues = Arc::new(UpdateQueues::new(router));

    run_polling(teloxide_bot, queues).await?;

    info!(
        total_tokens = components.store.total_usage().total_tokens,
        conversations = components.store.len(),
        "Bot stopped"
    );
    Ok(())
}
