//! Entities of the chat domain.

use super::{
    error::ConfigError,
    value_object::{MessageId, RoomKind, RoomName, UserId},
};

/// Placeholder shown when a message only carries ciphertext.
pub const ENCRYPTED_PLACEHOLDER: &str = "🔒 Encrypted message";

/// Placeholder shown when a message carries no content at all.
pub const EMPTY_PLACEHOLDER: &str = "Empty message";

/// Sender label used when the server omits the username.
pub const UNKNOWN_SENDER: &str = "Unknown User";

/// The room a session is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomIdentity {
    pub name: RoomName,
    pub kind: RoomKind,
}

/// A known user: id plus display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: UserId,
    pub display_name: String,
}

impl UserIdentity {
    /// Create an identity, rejecting blank ids or names.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        let display_name = display_name.into();
        if id.trim().is_empty() {
            return Err(ConfigError::MissingUserId);
        }
        if display_name.trim().is_empty() {
            return Err(ConfigError::MissingUsername);
        }
        Ok(Self {
            id: UserId::new(id),
            display_name,
        })
    }

    /// Parse a participant given as `ID=NAME`.
    pub fn parse_participant(raw: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidParticipant(raw.to_string());
        let (id, name) = raw.split_once('=').ok_or_else(invalid)?;
        Self::new(id.trim(), name.trim()).map_err(|_| invalid())
    }
}

/// Content of a chat message as far as the client can display it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    /// Plaintext is available.
    Text(String),
    /// Only ciphertext arrived.
    EncryptedOnly,
    /// Nothing to show.
    Empty,
}

impl MessageBody {
    /// Choose the body from the optional plaintext and ciphertext fields.
    ///
    /// Plaintext wins over ciphertext; empty strings count as absent.
    pub fn select(message: Option<&str>, encrypted_content: Option<&str>) -> Self {
        match (message, encrypted_content) {
            (Some(text), _) if !text.is_empty() => Self::Text(text.to_string()),
            (_, Some(cipher)) if !cipher.is_empty() => Self::EncryptedOnly,
            _ => Self::Empty,
        }
    }

    pub fn display_text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::EncryptedOnly => ENCRYPTED_PLACEHOLDER,
            Self::Empty => EMPTY_PLACEHOLDER,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        !matches!(self, Self::Text(_))
    }
}

/// A chat message received from (or echoed back by) the server.
///
/// Never persisted; lives only as long as its rendered line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: Option<MessageId>,
    pub sender_id: UserId,
    pub sender_name: Option<String>,
    pub body: MessageBody,
    /// RFC 3339 timestamp assigned by the server
    pub timestamp: Option<String>,
    pub is_own: bool,
    pub read_by_recipient: bool,
}

impl ChatMessage {
    /// Whether a read receipt should be sent for this message.
    pub fn needs_receipt(&self) -> bool {
        !self.is_own && self.id.is_some()
    }
}
