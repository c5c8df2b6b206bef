//! Console stand-in for the Hoge service.
//!
//! Each stdin line is one inbound message, either JSON
//! (`{"username":"alice","roomname":"general","text":"hi","mentions":["bob"]}`)
//! or the short form `@alice#general hi`. Sent messages are printed to stdout.
//! Room state lives in a [`MemoryClient`]. Once stdin is closed and every
//! queued line has been handed out, the `closed` token is cancelled.

use async_trait::async_trait;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{
        mpsc::{self, error::TryRecvError},
        Mutex,
    },
};
use tokio_util::sync::CancellationToken;

use hcb_core::{
    domain::{Identifier, Identity},
    Error, Result,
};
use hcb_hoge::{
    client::{HogeClient, RawMessage, RoomInfo},
    identity::parse_identifier,
    memory::MemoryClient,
};

pub struct ConsoleClient {
    inbox: Mutex<mpsc::UnboundedReceiver<RawMessage>>,
    rooms: MemoryClient,
    closed: CancellationToken,
}

impl ConsoleClient {
    /// Start reading stdin in the background.
    pub fn spawn(token: &str, closed: CancellationToken) -> Self {
        tracing::debug!(token_len = token.len(), "console client starting");
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) if line.trim().is_empty() => continue,
                    Ok(Some(line)) => match parse_line(&line) {
                        Ok(msg) => {
                            if tx.send(msg).is_err() {
                                break;
                            }
                        }
                        Err(e) => tracing::warn!(error = %e, "ignoring console line"),
                    },
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!(error = %e, "stdin read failed");
                        break;
                    }
                }
            }
            tracing::debug!("console input closed");
        });

        Self::from_receiver(rx, closed)
    }

    fn from_receiver(rx: mpsc::UnboundedReceiver<RawMessage>, closed: CancellationToken) -> Self {
        Self {
            inbox: Mutex::new(rx),
            rooms: MemoryClient::new(),
            closed,
        }
    }
}

/// Parse one console line into an inbound message.
pub fn parse_line(line: &str) -> Result<RawMessage> {
    let line = line.trim();
    if line.starts_with('{') {
        return Ok(serde_json::from_str(line)?);
    }

    let (head, text) = line.split_once(' ').unwrap_or((line, ""));
    match parse_identifier(head)? {
        Identifier::Occupant(o) => Ok(RawMessage::new(
            o.username(),
            o.room().as_str(),
            text.trim_start(),
        )),
        Identifier::User(_) => Err(Error::UnrecognizedIdentifier(format!(
            "{head} (console lines need @user#room)"
        ))),
    }
}

#[async_trait]
impl HogeClient for ConsoleClient {
    async fn new_messages(&self) -> Result<Vec<RawMessage>> {
        let mut rx = self.inbox.lock().await;
        let mut out = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(msg) => out.push(msg),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.closed.is_cancelled() {
                        tracing::info!("console input drained");
                        self.closed.cancel();
                    }
                    break;
                }
            }
        }
        Ok(out)
    }

    async fn send(&self, text: &str) -> Result<()> {
        println!("{text}");
        Ok(())
    }

    async fn join_room(&self, room: &str) -> Result<()> {
        self.rooms.join_room(room).await
    }

    async fn leave_room(&self, room: &str) -> Result<()> {
        self.rooms.leave_room(room).await
    }

    async fn create_room(&self, room: &str) -> Result<()> {
        self.rooms.create_room(room).await
    }

    async fn destroy_room(&self, room: &str) -> Result<()> {
        self.rooms.destroy_room(room).await
    }

    async fn exist_room(&self, room: &str) -> Result<bool> {
        self.rooms.exist_room(room).await
    }

    async fn is_joined(&self, room: &str) -> Result<bool> {
        self.rooms.is_joined(room).await
    }

    async fn room_info(&self, room: &str) -> Result<RoomInfo> {
        self.rooms.room_info(room).await
    }

    async fn set_room_topic(&self, room: &str, topic: &str) -> Result<()> {
        self.rooms.set_room_topic(room, topic).await
    }

    async fn get_room_usernames(&self, room: &str) -> Result<Vec<String>> {
        self.rooms.get_room_usernames(room).await
    }

    async fn invite(&self, room: &str, username: &str) -> Result<()> {
        self.rooms.invite(room, username).await
    }
}
