use std::fmt;

/// Anything that names a chat participant.
pub trait Identity {
    fn username(&self) -> &str;
}

/// Chat room name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A plain chat user.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct User {
    username: String,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

impl Identity for User {
    fn username(&self) -> &str {
        &self.username
    }
}

/// A user seen from inside one room. The room is fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Occupant {
    user: User,
    room: RoomId,
}

impl Occupant {
    pub fn new(user: User, room: RoomId) -> Self {
        Self { user, room }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn room(&self) -> &RoomId {
        &self.room
    }
}

impl Identity for Occupant {
    fn username(&self) -> &str {
        self.user.username()
    }
}

/// Reference to a participant, optionally scoped to a room.
///
/// Values are built on demand by the backend and never cached, so two lookups of
/// the same text produce equal but independent identifiers.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Identifier {
    User(User),
    Occupant(Occupant),
}

impl Identifier {
    pub fn user(username: impl Into<String>) -> Self {
        Self::User(User::new(username))
    }

    pub fn occupant(username: impl Into<String>, room: impl Into<String>) -> Self {
        Self::Occupant(Occupant::new(User::new(username), RoomId::new(room)))
    }

    pub fn room(&self) -> Option<&RoomId> {
        match self {
            Self::User(_) => None,
            Self::Occupant(o) => Some(o.room()),
        }
    }

    pub fn is_occupant(&self) -> bool {
        matches!(self, Self::Occupant(_))
    }
}

impl Identity for Identifier {
    fn username(&self) -> &str {
        match self {
            Self::User(u) => u.username(),
            Self::Occupant(o) => o.username(),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(u) => write!(f, "@{}", u.username()),
            Self::Occupant(o) => write!(f, "@{}{}", o.username(), o.room()),
        }
    }
}

/// Where a message is going: a participant or a whole room.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Address {
    Identifier(Identifier),
    Room(RoomId),
}

impl From<Identifier> for Address {
    fn from(id: Identifier) -> Self {
        Self::Identifier(id)
    }
}

impl From<RoomId> for Address {
    fn from(room: RoomId) -> Self {
        Self::Room(room)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(id) => write!(f, "{id}"),
            Self::Room(room) => write!(f, "{room}"),
        }
    }
}
