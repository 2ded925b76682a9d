//! UseCase: 受信フレームの振り分け処理
//!
//! Each inbound frame is routed by its `type` to exactly one handler.
//! Unknown types are ignored so newer servers can add frame types.

use crate::{domain::ViewPort, infrastructure::dto::websocket::InboundFrame};

use super::session::ChatSession;

impl<V: ViewPort> ChatSession<V> {
    /// Route one inbound frame.
    pub fn dispatch(&mut self, frame: InboundFrame) {
        tracing::debug!("Dispatching {} frame", frame.kind());

        match frame {
            InboundFrame::ChatMessage(chat) => {
                self.renderer
                    .display(&chat, &mut self.view, &self.transport, self.visible);
            }
            InboundFrame::UserJoined(joined) => {
                self.renderer.show_system_message(
                    &format!("{} joined the chat", joined.username),
                    false,
                    &mut self.view,
                );
                self.update_presence(&joined.user_id, true);
            }
            InboundFrame::UserLeft(left) => {
                self.renderer.show_system_message(
                    &format!("{} left the chat", left.username),
                    false,
                    &mut self.view,
                );
                self.update_presence(&left.user_id, false);
            }
            InboundFrame::UserPresence(presence) => {
                self.update_presence(&presence.user_id, presence.online);
            }
            InboundFrame::TypingIndicator(indicator) => {
                self.typing.on_remote_signal(
                    &self.user.id,
                    &indicator.user_id,
                    indicator.username.as_deref(),
                    indicator.typing,
                );
                self.typing.render_remote(&mut self.view);
            }
            InboundFrame::MessageRead(read) => {
                self.renderer.mark_read(&read, &mut self.view);
            }
            InboundFrame::OnlineUsers(online) => {
                let changed = self.presence.replace_all(online.users);
                for user_id in &changed {
                    self.presence.render_user(user_id, &mut self.view);
                }
                self.presence.render_summary(&mut self.view);
            }
            InboundFrame::Error(error) => {
                tracing::warn!("Server reported error: {}", error.error);
                self.renderer.show_system_message(
                    &format!("Error: {}", error.error),
                    true,
                    &mut self.view,
                );
            }
            InboundFrame::Unknown => {}
        }
    }
}
