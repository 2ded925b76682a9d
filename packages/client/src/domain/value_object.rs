//! Value objects of the chat domain.
//!
//! Ids arrive from the server either as JSON strings or as integers, so both
//! [`UserId`] and [`MessageId`] accept either form and compare by their
//! textual value (`1` and `"1"` are the same id).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Wire representation of an opaque id.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl From<WireId> for String {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Text(text) => text,
            WireId::Signed(n) => n.to_string(),
            WireId::Unsigned(n) => n.to_string(),
        }
    }
}

/// Opaque identifier of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "WireId", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<WireId> for UserId {
    fn from(id: WireId) -> Self {
        Self(id.into())
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-assigned identifier of a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "WireId", into = "String")]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<WireId> for MessageId {
    fn from(id: WireId) -> Self {
        Self(id.into())
    }
}

impl From<MessageId> for String {
    fn from(id: MessageId) -> Self {
        id.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a chat room. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigError::MissingRoomName);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of room, which decides how presence and sender names are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoomKind {
    /// Exactly two logical participants.
    Private,
    /// Any number of participants.
    #[default]
    Group,
}

impl RoomKind {
    /// Parse the room type supplied by the hosting page.
    ///
    /// Anything other than `private` is treated as a group room.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("private") {
            Self::Private
        } else {
            Self::Group
        }
    }

    pub fn is_private(self) -> bool {
        matches!(self, Self::Private)
    }
}
