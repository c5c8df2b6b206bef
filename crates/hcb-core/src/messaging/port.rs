use async_trait::async_trait;

use crate::{
    domain::{Identifier, RoomId},
    messaging::types::Message,
    presence::{Presence, PresenceStatus},
    Result,
};

/// Host-framework callbacks a backend dispatches inbound traffic to.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn on_message(&self, msg: &Message) -> Result<()>;

    /// Called after `on_message` when the message mentions other users.
    async fn on_mention(&self, _msg: &Message, _mentions: &[Identifier]) -> Result<()> {
        Ok(())
    }
}

/// Live view of one chat room.
///
/// Implementations hold no state of their own: every call goes to the chat
/// service, and preconditions (the room exists, the bot has joined) are left to
/// the service to enforce.
#[async_trait]
pub trait RoomPort: Send + Sync {
    fn id(&self) -> &RoomId;

    async fn join(&self) -> Result<()>;
    async fn leave(&self, reason: Option<&str>) -> Result<()>;
    async fn create(&self) -> Result<()>;
    async fn destroy(&self) -> Result<()>;

    async fn exists(&self) -> Result<bool>;
    async fn joined(&self) -> Result<bool>;

    async fn topic(&self) -> Result<Option<String>>;
    async fn set_topic(&self, topic: &str) -> Result<()>;

    async fn occupants(&self) -> Result<Vec<Identifier>>;
    async fn invite(&self, identifiers: &[Identifier]) -> Result<()>;
}

/// Adapter between one chat service and the host framework.
///
/// The host owns the scheduling: it calls [`ChatBackend::serve_once`] repeatedly
/// (see [`crate::serve::serve_forever`]) and uses the remaining methods to build
/// and send replies.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    type Room: RoomPort;
    type Connection;

    /// Unique name of this backend kind.
    fn mode(&self) -> &'static str;

    /// The bot's own identity, used as the sender of replies.
    fn bot_identifier(&self) -> &Identifier;

    /// Parse the backend's compact textual identifier format.
    fn build_identifier(&self, text: &str) -> Result<Identifier>;

    fn build_message(&self, text: &str) -> Message {
        Message::new(text)
    }

    fn build_reply(&self, msg: &Message, text: &str, private: bool) -> Message;

    /// Address a reply posted in a room to one participant.
    fn prefix_groupchat_reply(&self, msg: &mut Message, identifier: &Identifier);

    /// Fetch one batch of inbound messages and dispatch them to `handler`.
    ///
    /// Returns how many messages were dispatched.
    async fn serve_once(&self, handler: &dyn MessageHandler) -> Result<usize>;

    async fn send_message(&self, msg: &Message) -> Result<()>;

    /// The underlying client handle.
    fn connect(&self) -> Self::Connection;

    async fn query_room(&self, name: &str) -> Result<Self::Room>;

    /// Rooms the bot currently occupies.
    async fn rooms(&self) -> Result<Vec<Self::Room>>;

    async fn change_presence(&self, status: PresenceStatus, message: &str) -> Result<()>;

    async fn presence(&self) -> Presence;
}
