//! Domain layer of the chat client.
//!
//! Pure state and rules with no I/O: identities, presence, typing and the
//! view port the core renders through.

pub mod entity;
pub mod error;
pub mod presence;
pub mod typing;
pub mod value_object;
pub mod view;

pub use entity::{ChatMessage, MessageBody, RoomIdentity, UserIdentity};
pub use error::ConfigError;
pub use presence::{PresenceSnapshot, PresenceTracker};
pub use typing::{RemoteTypist, TypingCoordinator, TypingPhase, TypingSignal};
pub use value_object::{MessageId, RoomKind, RoomName, UserId};
pub use view::{MessageView, ReadStatus, Region, ViewPort};
