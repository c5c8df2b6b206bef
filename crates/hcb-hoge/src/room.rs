use std::sync::Arc;

use async_trait::async_trait;

use hcb_core::{
    domain::{Identifier, Identity, RoomId},
    messaging::port::RoomPort,
    Result,
};

use crate::client::HogeClient;

/// A Hoge chat room. Holds only its name and the shared client.
pub struct HogeRoom<C> {
    id: RoomId,
    client: Arc<C>,
}

impl<C> HogeRoom<C> {
    pub(crate) fn new(id: RoomId, client: Arc<C>) -> Self {
        Self { id, client }
    }

    pub fn name(&self) -> &str {
        self.id.as_str()
    }
}

impl<C> Clone for HogeRoom<C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            client: Arc::clone(&self.client),
        }
    }
}

impl<C> std::fmt::Debug for HogeRoom<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HogeRoom").field("id", &self.id).finish()
    }
}

#[async_trait]
impl<C: HogeClient> RoomPort for HogeRoom<C> {
    fn id(&self) -> &RoomId {
        &self.id
    }

    async fn join(&self) -> Result<()> {
        tracing::debug!(room = %self.id, "join");
        self.client.join_room(self.name()).await
    }

    async fn leave(&self, reason: Option<&str>) -> Result<()> {
        tracing::debug!(room = %self.id, reason = reason.unwrap_or(""), "leave");
        self.client.leave_room(self.name()).await
    }

    async fn create(&self) -> Result<()> {
        tracing::debug!(room = %self.id, "create");
        self.client.create_room(self.name()).await
    }

    async fn destroy(&self) -> Result<()> {
        tracing::debug!(room = %self.id, "destroy");
        self.client.destroy_room(self.name()).await
    }

    async fn exists(&self) -> Result<bool> {
        self.client.exist_room(self.name()).await
    }

    async fn joined(&self) -> Result<bool> {
        self.client.is_joined(self.name()).await
    }

    async fn topic(&self) -> Result<Option<String>> {
        Ok(self.client.room_info(self.name()).await?.topic)
    }

    async fn set_topic(&self, topic: &str) -> Result<()> {
        self.client.set_room_topic(self.name(), topic).await
    }

    async fn occupants(&self) -> Result<Vec<Identifier>> {
        let names = self.client.get_room_usernames(self.name()).await?;
        Ok(names.into_iter().map(Identifier::user).collect())
    }

    /// Invite each identifier in order; stops at the first failure.
    async fn invite(&self, identifiers: &[Identifier]) -> Result<()> {
        for ident in identifiers {
            self.client.invite(self.name(), ident.username()).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryClient;

    fn room(client: &Arc<MemoryClient>, name: &str) -> HogeRoom<MemoryClient> {
        HogeRoom::new(RoomId::new(name), Arc::clone(client))
    }

    #[tokio::test]
    async fn lifecycle_forwards_to_client() {
        let client = Arc::new(MemoryClient::new());
        let r = room(&client, "dev");

        assert!(!r.exists().await.unwrap());
        r.create().await.unwrap();
        assert!(r.exists().await.unwrap());
        r.join().await.unwrap();
        assert!(r.joined().await.unwrap());
        r.leave(Some("done")).await.unwrap();
        assert!(!r.joined().await.unwrap());
        r.destroy().await.unwrap();

        assert_eq!(
            client.calls(),
            vec![
                "exist_room(dev)",
                "create_room(dev)",
                "exist_room(dev)",
                "join_room(dev)",
                "is_joined(dev)",
                "leave_room(dev)",
                "is_joined(dev)",
                "destroy_room(dev)",
            ]
        );
    }

    #[tokio::test]
    async fn topic_is_read_live() {
        let client = Arc::new(MemoryClient::new().with_room(
            "general",
            Some("welcome"),
            Vec::<String>::new(),
        ));
        let r = room(&client, "general");

        assert_eq!(r.topic().await.unwrap().as_deref(), Some("welcome"));
        r.set_topic("release day").await.unwrap();
        assert_eq!(r.topic().await.unwrap().as_deref(), Some("release day"));
    }

    #[tokio::test]
    async fn occupants_are_plain_users() {
        let client =
            Arc::new(MemoryClient::new().with_room("general", None, ["alice", "bob"]));
        let r = room(&client, "general");

        let occ = r.occupants().await.unwrap();
        assert_eq!(occ, vec![Identifier::user("alice"), Identifier::user("bob")]);
        assert!(occ.iter().all(|o| !o.is_occupant()));
    }

    #[tokio::test]
    async fn invite_sends_one_call_per_identifier() {
        let client = Arc::new(MemoryClient::new().with_room("general", None, ["alice"]));
        let r = room(&client, "general");

        r.invite(&[
            Identifier::user("bob"),
            Identifier::occupant("carol", "elsewhere"),
        ])
        .await
        .unwrap();

        let calls = client.calls();
        assert_eq!(calls, vec!["invite(general, bob)", "invite(general, carol)"]);
        assert_eq!(
            r.occupants().await.unwrap(),
            vec![
                Identifier::user("alice"),
                Identifier::user("bob"),
                Identifier::user("carol"),
            ]
        );
    }

    #[tokio::test]
    async fn client_errors_propagate_unchanged() {
        let client = Arc::new(MemoryClient::new());
        let r = room(&client, "ghost");
        let err = r.join().await.unwrap_err();
        assert_eq!(err.to_string(), "chat client error: no such room: ghost");
    }
}
