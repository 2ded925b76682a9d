//! UseCase: メッセージ送信処理
//!
//! The message is not rendered locally: it appears once the server echoes it
//! back with its assigned id and timestamp.

use crate::{domain::ViewPort, infrastructure::dto::websocket::OutboundFrame};

use super::session::ChatSession;

impl<V: ViewPort> ChatSession<V> {
    /// Send the user's input as a chat message.
    ///
    /// Blank input, or a connection that is not open, makes this a no-op.
    ///
    /// # Returns
    ///
    /// `true` if the message was handed to the connection
    pub fn send_message(&mut self, text: &str) -> bool {
        let content = text.trim();
        if content.is_empty() {
            return false;
        }
        if !self.transport.is_open() {
            tracing::debug!("Not connected, message not sent");
            return false;
        }

        let frame = OutboundFrame::ChatMessage {
            message: content.to_string(),
            room_name: self.room.name.as_str().to_string(),
            sender_id: self.user.id.clone(),
            username: self.user.display_name.clone(),
        };
        let sent = self.transport.send(&frame);

        let signal = self.typing.stop();
        self.emit_typing(signal);
        sent
    }
}
