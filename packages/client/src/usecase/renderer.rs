//! UseCase: メッセージ描画処理
//!
//! Projects chat events onto the view and sends read receipts for received
//! messages through the transport.
//!
//! `display` is not idempotent: a duplicated `chat_message` frame renders a
//! second entry. `mark_read` is, since flipping a status twice changes nothing.

use chrono::Local;
use ciphertalk_shared::time::{Clock, format_clock_time};

use crate::{
    config::ReadReceiptPolicy,
    domain::{
        ChatMessage, MessageView, ReadStatus, Region, RoomKind, UserId, ViewPort,
        entity::UNKNOWN_SENDER,
    },
    infrastructure::{
        dto::websocket::{ChatMessageFrame, MessageReadFrame, OutboundFrame},
        transport::Transport,
    },
};

/// メッセージ描画のユースケース
pub struct MessageRenderer {
    local_user: UserId,
    room_name: String,
    room_kind: RoomKind,
    read_receipts: ReadReceiptPolicy,
    clock: Box<dyn Clock>,
}

impl MessageRenderer {
    pub fn new(
        local_user: UserId,
        room_name: String,
        room_kind: RoomKind,
        read_receipts: ReadReceiptPolicy,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            local_user,
            room_name,
            room_kind,
            read_receipts,
            clock,
        }
    }

    /// Project a domain message into its rendered form.
    ///
    /// The sender name appears only on received messages in group rooms.
    pub fn project(&self, message: &ChatMessage) -> MessageView {
        let sender_label = (!message.is_own && self.room_kind == RoomKind::Group).then(|| {
            message
                .sender_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_SENDER.to_string())
        });

        let status = message.is_own.then(|| {
            if message.read_by_recipient {
                ReadStatus::Read
            } else {
                ReadStatus::Sent
            }
        });

        MessageView {
            message_id: message.id.clone(),
            is_own: message.is_own,
            sender_label,
            content: message.body.display_text().to_string(),
            is_placeholder: message.body.is_placeholder(),
            time: format_clock_time(message.timestamp.as_deref(), self.clock.as_ref(), &Local),
            status,
        }
    }

    /// Append a chat message and acknowledge it if it was received.
    ///
    /// # Arguments
    ///
    /// * `frame` - The inbound `chat_message` frame
    /// * `view` - Rendering surface
    /// * `transport` - Used for the read receipt; nothing is sent unless open
    /// * `visible` - Whether the view is currently visible to the user
    ///
    /// # Returns
    ///
    /// `true` if a read receipt was sent
    pub fn display(
        &self,
        frame: &ChatMessageFrame,
        view: &mut dyn ViewPort,
        transport: &Transport,
        visible: bool,
    ) -> bool {
        if !view.has_region(Region::Messages) {
            tracing::debug!("No message list to render into, skipping message");
            return false;
        }

        let message = frame.to_entity(&self.local_user);
        view.append_message(&self.project(&message));
        view.scroll_to_bottom();

        if !message.needs_receipt() || !self.should_acknowledge(visible) {
            return false;
        }
        let Some(message_id) = message.id else {
            return false;
        };
        if !transport.is_open() {
            return false;
        }

        tracing::debug!("Acknowledging message {}", message_id);
        transport.send(&OutboundFrame::MessageRead {
            message_id,
            room_name: self.room_name.clone(),
        })
    }

    /// Flip the status of a rendered message to read.
    ///
    /// Unknown or missing ids are silently ignored.
    pub fn mark_read(&self, frame: &MessageReadFrame, view: &mut dyn ViewPort) -> bool {
        let Some(message_id) = &frame.message_id else {
            return false;
        };
        let found = view.mark_read(message_id);
        if !found {
            tracing::debug!("Read receipt for message {} not on screen", message_id);
        }
        found
    }

    /// Append a neutral or error system line.
    pub fn show_system_message(&self, text: &str, is_error: bool, view: &mut dyn ViewPort) {
        view.append_system(text, is_error);
        view.scroll_to_bottom();
    }

    fn should_acknowledge(&self, visible: bool) -> bool {
        match self.read_receipts {
            ReadReceiptPolicy::Eager => true,
            ReadReceiptPolicy::WhenVisible => visible,
        }
    }
}
