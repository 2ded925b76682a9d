//! View port trait definition
//!
//! The core never touches a concrete rendering surface. It writes through this
//! narrow capability set, and the concrete surface (terminal, in-memory fake)
//! lives in the infrastructure layer.

use super::value_object::{MessageId, UserId};

/// Addressable regions a rendering surface may or may not provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Messages,
    TypingIndicator,
    UserStatus,
    OnlineCount,
    PartnerStatus,
}

/// Delivery status shown next to the local user's own messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    Sent,
    Read,
}

/// Projection of a chat message ready to be appended to the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub message_id: Option<MessageId>,
    pub is_own: bool,
    /// Set only for received messages in group rooms
    pub sender_label: Option<String>,
    pub content: String,
    /// Content is a placeholder rather than real text
    pub is_placeholder: bool,
    /// `HH:MM`
    pub time: String,
    /// Present only on own messages
    pub status: Option<ReadStatus>,
}

/// Rendering surface the chat core writes to.
///
/// Implementations silently ignore writes to regions they do not provide.
#[cfg_attr(test, mockall::automock)]
pub trait ViewPort {
    /// Whether the surface provides `region`.
    fn has_region(&self, region: Region) -> bool;

    /// Append a chat message to the end of the list.
    fn append_message(&mut self, message: &MessageView);

    /// Append a system line, error-styled if `is_error`.
    fn append_system(&mut self, text: &str, is_error: bool);

    /// Flip the status indicator of a rendered own message to read.
    ///
    /// Returns `false` if no rendered message carries `message_id`.
    fn mark_read(&mut self, message_id: &MessageId) -> bool;

    /// Advance the list to the latest entry.
    fn scroll_to_bottom(&mut self);

    /// Show the typing banner with the given text.
    fn show_typing(&mut self, text: &str);

    /// Hide the typing banner.
    fn hide_typing(&mut self);

    /// Set the online indicator of a single user.
    fn set_user_status(&mut self, user_id: &UserId, online: bool);

    /// Set the aggregate online count.
    fn set_online_count(&mut self, count: usize);

    /// Set the partner status of a private room.
    fn set_partner_status(&mut self, online: bool);
}
