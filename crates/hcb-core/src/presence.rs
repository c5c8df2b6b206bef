use std::fmt;

use tokio::sync::RwLock;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PresenceStatus {
    #[default]
    Online,
    Away,
    DoNotDisturb,
    Offline,
}

impl fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Online => "online",
            Self::Away => "away",
            Self::DoNotDisturb => "dnd",
            Self::Offline => "offline",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Presence {
    pub status: PresenceStatus,
    pub message: String,
}

/// Framework-side record of the bot's presence.
///
/// Backends without a native presence API forward `change_presence` here.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    current: RwLock<Presence>,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, status: PresenceStatus, message: &str) -> Presence {
        let next = Presence {
            status,
            message: message.to_string(),
        };
        let mut guard = self.current.write().await;
        let previous = std::mem::replace(&mut *guard, next.clone());
        tracing::info!(
            from = %previous.status,
            to = %next.status,
            message = %next.message,
            "presence changed"
        );
        previous
    }

    pub async fn current(&self) -> Presence {
        self.current.read().await.clone()
    }
}
