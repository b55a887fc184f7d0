//! Update routing: group-mention filter in front of the handler chain, and per-conversation queues
//! that keep each conversation's updates in arrival order.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

use crate::chain::HandlerChain;
use crate::conversation::ConversationKey;
use crate::core::{ChatKind, HandlerResponse, Message, Result};
use crate::mention::filter_group_mention;

type QueueSender = mpsc::UnboundedSender<Message>;

/// Reply target for outgoing messages: none in private chats, the inbound message elsewhere.
pub fn reply_target(message: &Message) -> Option<&str> {
    match message.chat.kind {
        ChatKind::Private => None,
        _ => Some(message.id.as_str()),
    }
}

/// Entry point for every inbound text message.
#[derive(Clone)]
pub struct UpdateRouter {
    bot_username: String,
    chain: HandlerChain,
}

impl UpdateRouter {
    pub fn new(bot_username: impl Into<String>, chain: HandlerChain) -> Self {
        Self {
            bot_username: bot_username.into(),
            chain,
        }
    }

    pub fn bot_username(&self) -> &str {
        &self.bot_username
    }

    /// Drops group messages that do not mention the bot (`Ignore`) and strips the mention from the
    /// ones that do; everything else goes to the chain unchanged.
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    pub async fn route(&self, mut message: Message) -> Result<HandlerResponse> {
        if message.chat.kind.is_group_like() {
            match filter_group_mention(&message.content, &message.entities, &self.bot_username) {
                Some(text) => message.content = text,
                None => {
                    debug!("Group message without mention, dropped");
                    return Ok(HandlerResponse::Ignore);
                }
            }
        }

        self.chain.handle(&message).await
    }
}

/// One FIFO queue and worker task per conversation key. Updates for one key are routed one at a
/// time in the order they were pushed; different keys run concurrently.
pub struct UpdateQueues {
    router: Arc<UpdateRouter>,
    queues: DashMap<ConversationKey, QueueSender>,
}

impl UpdateQueues {
    pub fn new(router: Arc<UpdateRouter>) -> Self {
        Self {
            router,
            queues: DashMap::new(),
        }
    }

    pub fn router(&self) -> &UpdateRouter {
        &self.router
    }

    /// Queues `message` behind earlier updates of its conversation. Must be called inside a tokio
    /// runtime; the first update of a key spawns that key's worker.
    pub fn push(&self, message: Message) {
        let key = message.conversation_key();
        let mut sender = self
            .queues
            .entry(key)
            .or_insert_with(|| self.spawn_worker(key));
        if let Err(mpsc::error::SendError(message)) = sender.send(message) {
            // worker gone (its task panicked); start a fresh one for this key
            let replacement = self.spawn_worker(key);
            if replacement.send(message).is_err() {
                error!(conversation_key = %key, "Failed to queue update");
            }
            *sender = replacement;
        }
    }

    fn spawn_worker(&self, key: ConversationKey) -> QueueSender {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(Self::drain(Arc::clone(&self.router), key, rx));
        tx
    }

    async fn drain(
        router: Arc<UpdateRouter>,
        key: ConversationKey,
        mut rx: mpsc::UnboundedReceiver<Message>,
    ) {
        info!(conversation_key = %key, "Conversation queue started");
        while let Some(message) = rx.recv().await {
            let user_id = message.user.id;
            let chat_id = message.chat.id;
            debug!(user_id, chat_id, message_id = %message.id, "step: routing update");
            if let Err(e) = router.route(message).await {
                error!(error = %e, user_id, chat_id, "Update failed");
            }
        }
    }
}
