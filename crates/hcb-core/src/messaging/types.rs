use chrono::{DateTime, Utc};

use crate::domain::{Address, Identifier, Identity};

/// One chat message, inbound or outbound.
///
/// Built per event and never persisted. Outbound messages start with no
/// addressing; the backend fills `from`/`to` when it builds a reply.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub from: Option<Identifier>,
    pub to: Option<Address>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            from: None,
            to: None,
            body: body.into(),
            created_at: Utc::now(),
        }
    }

    pub fn with_from(mut self, from: Identifier) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_to(mut self, to: impl Into<Address>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// True when the message was posted inside a room rather than sent directly.
    pub fn is_group(&self) -> bool {
        matches!(self.to, Some(Address::Room(_)))
    }

    pub fn sender_name(&self) -> Option<&str> {
        self.from.as_ref().map(|f| f.username())
    }
}
