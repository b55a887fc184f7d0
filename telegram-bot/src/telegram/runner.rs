//! Long-polling runner: converts teloxide messages to core::Message and queues them per
//! conversation. The dispatcher stops on SIGINT/SIGTERM through its shutdown token.

use crate::core::ToCoreMessage;
use crate::dispatch::UpdateQueues;
use anyhow::Result;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error, info, instrument, warn};

use super::adapters::TelegramMessageWrapper;

/// Resolves on SIGINT, or SIGTERM on unix. A handler that fails to install never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}

/// Waits for `signal` and calls `stop`. While `stop` fails (the dispatcher is not running yet), goes
/// back to waiting so a later signal can still stop it.
async fn stop_on_signal<S, D, E>(
    mut signal: impl FnMut() -> S,
    mut stop: impl FnMut() -> std::result::Result<D, E>,
) where
    S: Future<Output = ()>,
    D: Future<Output = ()>,
    E: Debug,
{
    loop {
        signal().await;
        match stop() {
            Ok(done) => {
                done.await;
                return;
            }
            Err(e) => warn!(
                error = ?e,
                "Dispatcher is not running yet, waiting for the next signal"
            ),
        }
    }
}

/// Polls updates until a shutdown signal arrives. Each text message goes to its conversation's
/// queue; a failing update is logged by the queue worker and never stops the loop.
#[instrument(skip(bot, queues), fields(bot_username = %queues.router().bot_username()))]
pub async fn run_polling(bot: teloxide::Bot, queues: Arc<UpdateQueues>) -> Result<()> {
    let handler = Update::filter_message().endpoint(move |msg: Message| {
        let queues = Arc::clone(&queues);
        async move {
            match TelegramMessageWrapper(&msg).to_core() {
                Some(core_msg) => queues.push(core_msg),
                None => debug!(chat_id = msg.chat.id.0, "Ignoring non-text message"),
            }
            Ok::<(), std::convert::Infallible>(())
        }
    });

    let mut dispatcher = Dispatcher::builder(bot, handler).build();
    let shutdown = dispatcher.shutdown_token();
    tokio::spawn(async move { stop_on_signal(shutdown_signal, || shutdown.shutdown()).await });

    info!("Starting long polling dispatcher");
    dispatcher.dispatch().await;
    info!("Dispatcher stopped");
    Ok(())
}
