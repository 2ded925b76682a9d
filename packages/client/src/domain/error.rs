//! Domain error types.

use thiserror::Error;

/// Errors raised while assembling the session context.
///
/// Any of these is fatal to client start: no socket is opened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Room name is missing or blank
    #[error("room name is required")]
    MissingRoomName,

    /// Local user id is missing or blank
    #[error("user id is required")]
    MissingUserId,

    /// Local username is missing or blank
    #[error("username is required")]
    MissingUsername,

    /// Participant entry could not be parsed
    #[error("invalid participant '{0}', expected ID=NAME")]
    InvalidParticipant(String),
}
