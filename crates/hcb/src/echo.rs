use std::sync::Arc;

use async_trait::async_trait;

use hcb_core::{
    domain::{Identifier, Identity},
    messaging::{
        port::{ChatBackend, MessageHandler},
        types::Message,
    },
    Result,
};

/// Replies to every message with its own text.
pub struct EchoHandler<B> {
    backend: Arc<B>,
}

impl<B: ChatBackend> EchoHandler<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<B: ChatBackend> MessageHandler for EchoHandler<B> {
    async fn on_message(&self, msg: &Message) -> Result<()> {
        let Some(from) = &msg.from else {
            return Ok(());
        };
        if from.username() == self.backend.bot_identifier().username() {
            return Ok(());
        }

        let mut reply = self.backend.build_reply(msg, &msg.body, false);
        if msg.is_group() {
            self.backend.prefix_groupchat_reply(&mut reply, from);
        }
        self.backend.send_message(&reply).await
    }

    async fn on_mention(&self, msg: &Message, mentions: &[Identifier]) -> Result<()> {
        let names: Vec<&str> = mentions.iter().map(|m| m.username()).collect();
        tracing::info!(from = ?msg.sender_name(), mentioned = ?names, "mention");
        Ok(())
    }
}
