//! Hoge chat backend.
//!
//! Implements the `hcb-core` ports over a [`client::HogeClient`] handle. Every
//! operation is a direct forward to the client; nothing is cached.

use std::sync::Arc;

use async_trait::async_trait;

use hcb_core::{
    config::Config,
    domain::{Address, Identifier, Identity, RoomId},
    errors::Error,
    messaging::{
        port::{ChatBackend, MessageHandler},
        types::Message,
    },
    presence::{Presence, PresenceStatus, PresenceTracker},
    Result,
};

pub mod client;
pub mod identity;
pub mod memory;
pub mod room;

use crate::{
    client::{HogeClient, RawMessage},
    room::HogeRoom,
};

/// Backend mode name, matched against `BACKEND` in the config.
pub const MODE: &str = "hoge";

pub struct HogeBackend<C> {
    client: Arc<C>,
    bot: Identifier,
    presence: PresenceTracker,
}

impl<C: HogeClient> HogeBackend<C> {
    /// Validate the config and open a client with its token.
    ///
    /// A missing or blank token fails with [`Error::Config`] before `connect`
    /// is called.
    pub fn new<F>(cfg: &Config, connect: F) -> Result<Self>
    where
        F: FnOnce(&str) -> Result<C>,
    {
        if cfg.backend != MODE {
            return Err(Error::Config(format!(
                "BACKEND is {:?}, this backend is {MODE:?}",
                cfg.backend
            )));
        }

        let token = cfg
            .identity
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                tracing::error!("no token in BOT_IDENTITY_TOKEN");
                Error::Config(
                    "You need to set your token in the BOT_IDENTITY_TOKEN setting".to_string(),
                )
            })?;

        let client = connect(token)?;
        tracing::info!(bot = %cfg.identity.name, "hoge client ready");

        Ok(Self::with_client(Arc::new(client), &cfg.identity.name))
    }

    /// Wrap an already-open client.
    pub fn with_client(client: Arc<C>, bot_name: &str) -> Self {
        Self {
            client,
            bot: Identifier::user(bot_name),
            presence: PresenceTracker::new(),
        }
    }

    /// Live view of a room by name. Does not check that it exists.
    pub fn room(&self, id: RoomId) -> HogeRoom<C> {
        HogeRoom::new(id, Arc::clone(&self.client))
    }

    fn inbound_message(&self, raw: &RawMessage) -> Message {
        Message::new(raw.text.clone())
            .with_from(Identifier::occupant(&raw.username, &raw.roomname))
            .with_to(RoomId::new(&raw.roomname))
    }
}

#[async_trait]
impl<C: HogeClient> ChatBackend for HogeBackend<C> {
    type Room = HogeRoom<C>;
    type Connection = Arc<C>;

    fn mode(&self) -> &'static str {
        MODE
    }

    fn bot_identifier(&self) -> &Identifier {
        &self.bot
    }

    fn build_identifier(&self, text: &str) -> Result<Identifier> {
        identity::parse_identifier(text)
    }

    /// Reply from the bot to whoever sent `msg`. `private` has no effect: the
    /// client has no direct-message primitive.
    fn build_reply(&self, msg: &Message, text: &str, _private: bool) -> Message {
        let mut reply = self.build_message(text).with_from(self.bot.clone());
        reply.to = msg.from.clone().map(Address::from);
        reply
    }

    fn prefix_groupchat_reply(&self, msg: &mut Message, identifier: &Identifier) {
        msg.body = format!("@{} {}", identifier.username(), msg.body);
    }

    async fn serve_once(&self, handler: &dyn MessageHandler) -> Result<usize> {
        let batch = self.client.new_messages().await?;
        let count = batch.len();

        for raw in batch {
            let msg = self.inbound_message(&raw);
            tracing::debug!(from = %raw.username, room = %raw.roomname, "inbound message");
            handler.on_message(&msg).await?;

            // Mentioned users come from the client; the text is not parsed.
            if raw.has_mention_marker() {
                let mentions: Vec<Identifier> =
                    raw.mentions.iter().map(Identifier::user).collect();
                handler.on_mention(&msg, &mentions).await?;
            }
        }

        Ok(count)
    }

    async fn send_message(&self, msg: &Message) -> Result<()> {
        if let Some(to) = &msg.to {
            tracing::debug!(%to, "send");
        }
        self.client.send(&msg.body).await
    }

    fn connect(&self) -> Self::Connection {
        Arc::clone(&self.client)
    }

    async fn query_room(&self, name: &str) -> Result<Self::Room> {
        let info = self.client.room_info(name).await?;
        Ok(self.room(RoomId::new(info.name)))
    }

    // TODO: list joined rooms once the client exposes a membership query.
    async fn rooms(&self) -> Result<Vec<Self::Room>> {
        Ok(Vec::new())
    }

    async fn change_presence(&self, status: PresenceStatus, message: &str) -> Result<()> {
        self.presence.set(status, message).await;
        Ok(())
    }

    async fn presence(&self) -> Presence {
        self.presence.current().await
    }
}
