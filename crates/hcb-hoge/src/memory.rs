//! In-process Hoge service, for tests and local runs.

use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;

use hcb_core::{Error, Result};

use crate::client::{HogeClient, RawMessage, RoomInfo};

#[derive(Debug, Default)]
struct RoomState {
    topic: Option<String>,
    members: BTreeSet<String>,
    joined: bool,
}

#[derive(Debug, Default)]
struct State {
    rooms: BTreeMap<String, RoomState>,
    inbox: VecDeque<RawMessage>,
    sent: Vec<String>,
    calls: Vec<String>,
}

/// A [`HogeClient`] backed by plain in-memory state.
///
/// Every call is appended to a log readable through [`MemoryClient::calls`].
#[derive(Debug, Default)]
pub struct MemoryClient {
    state: Mutex<State>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a room with a topic and members.
    pub fn with_room<I, S>(self, name: &str, topic: Option<&str>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock().rooms.insert(
            name.to_string(),
            RoomState {
                topic: topic.map(str::to_string),
                members: members.into_iter().map(Into::into).collect(),
                joined: false,
            },
        );
        self
    }

    /// Queue an inbound message for the next `new_messages` call.
    pub fn push_inbound(&self, msg: RawMessage) {
        self.lock().inbox.push_back(msg);
    }

    /// Texts passed to `send`, oldest first.
    pub fn sent(&self) -> Vec<String> {
        self.lock().sent.clone()
    }

    /// Client calls in order, formatted as `op(args)`.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(state: &mut State, call: String) {
        tracing::trace!(%call, "memory client call");
        state.calls.push(call);
    }
}

fn no_such_room(room: &str) -> Error {
    Error::Client(format!("no such room: {room}"))
}

fn room_mut<'a>(state: &'a mut State, room: &str) -> Result<&'a mut RoomState> {
    state.rooms.get_mut(room).ok_or_else(|| no_such_room(room))
}

#[async_trait]
impl HogeClient for MemoryClient {
    async fn new_messages(&self) -> Result<Vec<RawMessage>> {
        let mut st = self.lock();
        Self::record(&mut st, "new_messages()".to_string());
        Ok(st.inbox.drain(..).collect())
    }

    async fn send(&self, text: &str) -> Result<()> {
        let mut st = self.lock();
        Self::record(&mut st, format!("send({text})"));
        st.sent.push(text.to_string());
        Ok(())
    }

    async fn join_room(&self, room: &str) -> Result<()> {
        let mut st = self.lock();
        Self::record(&mut st, format!("join_room({room})"));
        room_mut(&mut st, room)?.joined = true;
        Ok(())
    }

    async fn leave_room(&self, room: &str) -> Result<()> {
        let mut st = self.lock();
        Self::record(&mut st, format!("leave_room({room})"));
        room_mut(&mut st, room)?.joined = false;
        Ok(())
    }

    async fn create_room(&self, room: &str) -> Result<()> {
        let mut st = self.lock();
        Self::record(&mut st, format!("create_room({room})"));
        if st.rooms.contains_key(room) {
            return Err(Error::Client(format!("room already exists: {room}")));
        }
        st.rooms.insert(room.to_string(), RoomState::default());
        Ok(())
    }

    async fn destroy_room(&self, room: &str) -> Result<()> {
        let mut st = self.lock();
        Self::record(&mut st, format!("destroy_room({room})"));
        st.rooms
            .remove(room)
            .map(|_| ())
            .ok_or_else(|| no_such_room(room))
    }

    async fn exist_room(&self, room: &str) -> Result<bool> {
        let mut st = self.lock();
        Self::record(&mut st, format!("exist_room({room})"));
        Ok(st.rooms.contains_key(room))
    }

    async fn is_joined(&self, room: &str) -> Result<bool> {
        let mut st = self.lock();
        Self::record(&mut st, format!("is_joined({room})"));
        Ok(room_mut(&mut st, room)?.joined)
    }

    async fn room_info(&self, room: &str) -> Result<RoomInfo> {
        let mut st = self.lock();
        Self::record(&mut st, format!("room_info({room})"));
        let topic = room_mut(&mut st, room)?.topic.clone();
        Ok(RoomInfo {
            name: room.to_string(),
            topic,
        })
    }

    async fn set_room_topic(&self, room: &str, topic: &str) -> Result<()> {
        let mut st = self.lock();
        Self::record(&mut st, format!("set_room_topic({room}, {topic})"));
        room_mut(&mut st, room)?.topic = Some(topic.to_string());
        Ok(())
    }

    async fn get_room_usernames(&self, room: &str) -> Result<Vec<String>> {
        let mut st = self.lock();
        Self::record(&mut st, format!("get_room_usernames({room})"));
        Ok(room_mut(&mut st, room)?.members.iter().cloned().collect())
    }

    async fn invite(&self, room: &str, username: &str) -> Result<()> {
        let mut st = self.lock();
        Self::record(&mut st, format!("invite({room}, {username})"));
        room_mut(&mut st, room)?.members.insert(username.to_string());
        Ok(())
    }
}
