//! The Hoge chat client surface the backend consumes.
//!
//! The real client library lives outside this workspace; anything that speaks
//! the Hoge service plugs in behind [`HogeClient`].

use async_trait::async_trait;
use serde::Deserialize;

use hcb_core::Result;

/// Inbound message as delivered by the client.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RawMessage {
    pub username: String,
    pub roomname: String,
    pub text: String,
    /// Usernames the service flagged as mentioned, if it reports them.
    #[serde(default)]
    pub mentions: Vec<String>,
}

impl RawMessage {
    pub fn new(
        username: impl Into<String>,
        roomname: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            roomname: roomname.into(),
            text: text.into(),
            mentions: Vec::new(),
        }
    }

    pub fn with_mentions<I, S>(mut self, mentions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mentions = mentions.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the text carries a mention marker.
    pub fn has_mention_marker(&self) -> bool {
        self.text.contains('@')
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomInfo {
    pub name: String,
    pub topic: Option<String>,
}

/// Operations offered by a Hoge chat client handle.
///
/// Errors are returned as [`hcb_core::Error::Client`]; the backend propagates
/// them untouched.
#[async_trait]
pub trait HogeClient: Send + Sync {
    /// Messages received since the previous call.
    async fn new_messages(&self) -> Result<Vec<RawMessage>>;
    async fn send(&self, text: &str) -> Result<()>;

    async fn join_room(&self, room: &str) -> Result<()>;
    async fn leave_room(&self, room: &str) -> Result<()>;
    async fn create_room(&self, room: &str) -> Result<()>;
    async fn destroy_room(&self, room: &str) -> Result<()>;

    async fn exist_room(&self, room: &str) -> Result<bool>;
    async fn is_joined(&self, room: &str) -> Result<bool>;
    async fn room_info(&self, room: &str) -> Result<RoomInfo>;
    async fn set_room_topic(&self, room: &str, topic: &str) -> Result<()>;
    async fn get_room_usernames(&self, room: &str) -> Result<Vec<String>>;
    async fn invite(&self, room: &str, username: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_message_mentions_default_to_empty() {
        let raw: RawMessage =
            serde_json::from_str(r#"{"username":"alice","roomname":"general","text":"hi"}"#)
                .unwrap();
        assert_eq!(raw, RawMessage::new("alice", "general", "hi"));
        assert!(!raw.has_mention_marker());
    }

    #[test]
    fn mention_marker_is_any_at_sign() {
        let raw = RawMessage::new("alice", "general", "ping @bob");
        assert!(raw.has_mention_marker());
    }
}
