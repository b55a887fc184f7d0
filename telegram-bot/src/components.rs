//! Component factory: builds the shared services and the handler chain from config.
//! Isolates assembly logic from the runner so tests can inject a mock Bot and LLM.

use std::sync::Arc;

use llm_client::{mask_token, LlmClient, OpenAILlmClient};
use tracing::{info, instrument};

use crate::chain::HandlerChain;
use crate::config::EnvConfig;
use crate::conversation::ConversationStore;
use crate::core::Bot;
use crate::handlers::{AuthHandler, ChatHandler, CommandHandler, LoggingHandler};
use crate::live_output::LiveOutput;

/// Shared services behind the handler chain.
#[derive(Clone)]
pub struct BotComponents {
    pub bot: Arc<dyn Bot>,
    pub llm: Arc<dyn LlmClient>,
    pub store: Arc<ConversationStore>,
    pub live_output: LiveOutput,
}

impl BotComponents {
    /// Assembles components around an existing Bot and LLM client (production adapters or test doubles).
    pub fn new(config: &EnvConfig, bot: Arc<dyn Bot>, llm: Arc<dyn LlmClient>) -> Self {
        let store = Arc::new(ConversationStore::new(&config.prompt_init));
        let live_output = LiveOutput::new(bot.clone(), config.edit_wait());
        Self {
            bot,
            llm,
            store,
            live_output,
        }
    }
}

/// Builds the OpenAI-backed LLM client from config.
#[instrument(skip(config))]
pub fn build_llm_client(config: &EnvConfig) -> Arc<dyn LlmClient> {
    info!(
        base_url = %config.openai_base_url,
        api_key = %mask_token(&config.openai_api_key),
        "Using OpenAI completion client"
    );
    Arc::new(OpenAILlmClient::with_base_url(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
    ))
}

/// Logging → Auth → Command → Chat.
pub fn build_handler_chain(config: &EnvConfig, components: &BotComponents) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(AuthHandler::new(
            Arc::new(config.clone()),
            components.bot.clone(),
        )))
        .add_handler(Arc::new(CommandHandler::new(
            components.bot.clone(),
            components.store.clone(),
        )))
        .add_handler(Arc::new(ChatHandler::new(
            components.bot.clone(),
            components.llm.clone(),
            components.store.clone(),
            components.live_output.clone(),
        )))
}
