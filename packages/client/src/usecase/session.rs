//! Chat session: the composition root of the chat core.
//!
//! A session is an explicitly constructed object owning all per-room state
//! and its view. It performs no I/O of its own; the runner feeds it transport
//! events, input events and idle-timer expiries in arrival order.

use ciphertalk_shared::time::{Clock, SystemClock};
use tokio::time::Instant;

use crate::{
    config::ClientConfig,
    domain::{
        PresenceTracker, RoomIdentity, TypingCoordinator, TypingSignal, UserId, UserIdentity,
        ViewPort,
    },
    infrastructure::{
        dto::websocket::{InboundFrame, OutboundFrame},
        transport::{ConnectionState, Transport, TransportEvent},
    },
};

use super::renderer::MessageRenderer;

pub const CONNECTED_NOTICE: &str = "Connected to chat";
pub const RECONNECTING_NOTICE: &str = "Connection lost. Reconnecting...";

/// Events coming from the user's side of the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was pressed in the message input
    Keystroke,
    /// The message input gained focus
    Focus,
    /// The message input lost focus
    Blur,
    /// The user asked to send the current input
    Submit(String),
    /// The view was backgrounded
    Hidden,
    /// The view came back to the foreground
    Visible,
}

pub struct ChatSession<V: ViewPort> {
    pub(crate) room: RoomIdentity,
    pub(crate) user: UserIdentity,
    pub(crate) transport: Transport,
    pub(crate) presence: PresenceTracker,
    pub(crate) typing: TypingCoordinator,
    pub(crate) renderer: MessageRenderer,
    pub(crate) view: V,
    pub(crate) visible: bool,
}

impl<V: ViewPort> ChatSession<V> {
    pub fn new(config: &ClientConfig, view: V) -> Self {
        Self::with_clock(config, view, Box::new(SystemClock))
    }

    /// Create a session that reads wall-clock time from `clock`.
    ///
    /// The local user is shown online right away, before the socket opens.
    pub fn with_clock(config: &ClientConfig, view: V, clock: Box<dyn Clock>) -> Self {
        let presence =
            PresenceTracker::new(&config.user.id, config.room.kind, &config.participants);
        let renderer = MessageRenderer::new(
            config.user.id.clone(),
            config.room.name.as_str().to_string(),
            config.room.kind,
            config.read_receipts,
            clock,
        );

        let mut session = Self {
            room: config.room.clone(),
            user: config.user.clone(),
            transport: Transport::new(),
            presence,
            typing: TypingCoordinator::new(config.typing_idle),
            renderer,
            view,
            visible: true,
        };
        let local = session.user.id.clone();
        session.update_presence(&local, true);
        session
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.transport.state()
    }

    pub fn presence(&self) -> &PresenceTracker {
        &self.presence
    }

    pub fn typing(&self) -> &TypingCoordinator {
        &self.typing
    }

    /// When the typing idle timer fires, if armed.
    pub fn typing_deadline(&self) -> Option<Instant> {
        self.typing.deadline()
    }

    /// Apply one event from the connection task.
    pub fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Connecting { attempt } => {
                tracing::debug!("Connection attempt {}", attempt);
                self.transport.on_connecting();
            }
            TransportEvent::Open { outgoing } => {
                tracing::info!("Connected to room '{}'", self.room.name);
                self.transport.on_open(outgoing);
                let local = self.user.id.clone();
                self.update_presence(&local, true);
                self.renderer
                    .show_system_message(CONNECTED_NOTICE, false, &mut self.view);
            }
            TransportEvent::Frame(text) => match InboundFrame::parse(&text) {
                Ok(frame) => self.dispatch(frame),
                Err(e) => tracing::warn!("Dropping frame: {}", e),
            },
            TransportEvent::Closed { code, reason } => {
                tracing::warn!("Connection closed (code {}): {}", code, reason);
                self.transport.on_close();
                self.renderer
                    .show_system_message(RECONNECTING_NOTICE, false, &mut self.view);
                let local = self.user.id.clone();
                self.update_presence(&local, false);
            }
            TransportEvent::Error(e) => {
                tracing::error!("WebSocket error: {}", e);
            }
        }
    }

    /// Apply one event from the input side.
    pub fn handle_input(&mut self, event: InputEvent, now: Instant) {
        match event {
            InputEvent::Keystroke => {
                let signal = self.typing.on_input(self.transport.is_open(), now);
                self.emit_typing(signal);
            }
            InputEvent::Focus => {
                let signal = self.typing.on_focus();
                self.emit_typing(signal);
            }
            InputEvent::Blur => {
                let signal = self.typing.stop();
                self.emit_typing(signal);
            }
            InputEvent::Submit(text) => {
                self.send_message(&text);
            }
            InputEvent::Hidden => self.visible = false,
            InputEvent::Visible => {
                self.visible = true;
                self.view.scroll_to_bottom();
            }
        }
    }

    /// The typing idle timer fired.
    pub fn on_typing_timeout(&mut self, now: Instant) {
        let signal = self.typing.on_timer(now);
        self.emit_typing(signal);
    }

    /// Tear the session down, telling the room we left if still connected.
    pub fn shutdown(&mut self) {
        let frame = OutboundFrame::UserLeft {
            room_name: self.room.name.as_str().to_string(),
            user_id: self.user.id.clone(),
            username: self.user.display_name.clone(),
        };
        if self.transport.send(&frame) {
            tracing::info!("Sent leave notice for room '{}'", self.room.name);
        }
    }

    pub(crate) fn emit_typing(&mut self, signal: Option<TypingSignal>) {
        let room_name = self.room.name.as_str().to_string();
        let frame = match signal {
            Some(TypingSignal::Start) => OutboundFrame::TypingStart { room_name },
            Some(TypingSignal::Stop) => OutboundFrame::TypingStop { room_name },
            None => return,
        };
        self.transport.send(&frame);
    }

    pub(crate) fn update_presence(&mut self, user_id: &UserId, online: bool) {
        self.presence.set_online(user_id, online);
        self.presence.render_user(user_id, &mut self.view);
        self.presence.render_summary(&mut self.view);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ciphertalk_shared::time::FixedClock;
    use tokio::sync::mpsc;

    use super::*;
    use crate::{
        config::ReadReceiptPolicy,
        domain::{RoomKind, TypingPhase},
        infrastructure::{transport::TransportError, view::InMemoryView},
    };

    fn config() -> ClientConfig {
        ClientConfig::new("localhost:8000", "alice-bob", RoomKind::Private, "1", "alice")
            .unwrap()
            .with_participants(vec![
                UserIdentity::new("1", "alice").unwrap(),
                UserIdentity::new("2", "bob").unwrap(),
            ])
    }

    fn session() -> ChatSession<InMemoryView> {
        ChatSession::with_clock(
            &config(),
            InMemoryView::new(),
            Box::new(FixedClock::from_millis(0)),
        )
    }

    fn open(session: &mut ChatSession<InMemoryView>) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        session.handle_transport_event(TransportEvent::Open { outgoing: tx });
        rx
    }

    fn sent_types(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
        let mut types = Vec::new();
        while let Ok(json) = rx.try_recv() {
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            types.push(value["type"].as_str().unwrap_or_default().to_string());
        }
        types
    }

    #[test]
    fn test_new_session_marks_self_online() {
        // テスト項目: セッション作成時に自分がオンラインとして表示される
        // given (前提条件):

        // when (操作):
        let session = session();

        // then (期待する結果):
        assert_eq!(session.view().user_status(&UserId::new("1")), Some(true));
        assert_eq!(session.view().online_count(), Some(1));
        assert_eq!(session.view().partner_status(), Some(false));
        assert_eq!(session.connection_state(), ConnectionState::Connecting);
    }

    #[test]
    fn test_open_shows_notice() {
        // テスト項目: 接続時に Open 状態となり接続メッセージが表示される
        // given (前提条件):
        let mut session = session();

        // when (操作):
        let _rx = open(&mut session);

        // then (期待する結果):
        assert_eq!(session.connection_state(), ConnectionState::Open);
        assert_eq!(session.view().system_lines(), vec![(CONNECTED_NOTICE, false)]);
        assert!(session.presence().is_online(&UserId::new("1")));
    }

    #[test]
    fn test_close_marks_self_offline_and_shows_notice() {
        // テスト項目: 切断時に Closed 状態となり自分がオフライン表示になる
        // given (前提条件):
        let mut session = session();
        let _rx = open(&mut session);

        // when (操作):
        session.handle_transport_event(TransportEvent::Error(TransportError::Read(
            "reset".to_string(),
        )));
        session.handle_transport_event(TransportEvent::Closed {
            code: 1006,
            reason: String::new(),
        });

        // then (期待する結果):
        assert_eq!(session.connection_state(), ConnectionState::Closed);
        assert_eq!(
            session.view().system_lines(),
            vec![(CONNECTED_NOTICE, false), (RECONNECTING_NOTICE, false)]
        );
        assert_eq!(session.view().user_status(&UserId::new("1")), Some(false));
        assert_eq!(session.presence().snapshot().count, 0);
    }

    #[test]
    fn test_malformed_frame_is_dropped() {
        // テスト項目: 不正なフレームは破棄され、接続状態や表示に影響しない
        // given (前提条件):
        let mut session = session();
        let _rx = open(&mut session);
        let before = session.view().entries().len();

        // when (操作):
        session.handle_transport_event(TransportEvent::Frame("{oops".to_string()));

        // then (期待する結果):
        assert_eq!(session.connection_state(), ConnectionState::Open);
        assert_eq!(session.view().entries().len(), before);
    }

    #[test]
    fn test_keystrokes_emit_single_typing_start() {
        // テスト項目: 連続したキー入力で typing_start は 1 回だけ送られる
        // given (前提条件):
        let mut session = session();
        let mut rx = open(&mut session);
        let now = Instant::now();

        // when (操作):
        session.handle_input(InputEvent::Focus, now);
        for _ in 0..5 {
            session.handle_input(InputEvent::Keystroke, now);
        }

        // then (期待する結果):
        assert_eq!(sent_types(&mut rx), vec!["typing_start"]);
        assert_eq!(session.typing().phase(), TypingPhase::Typing);
        assert_eq!(session.typing_deadline(), Some(now + Duration::from_secs(3)));
    }

    #[test]
    fn test_blur_then_timeout_emits_single_stop() {
        // テスト項目: blur 後にタイマーが発火しても typing_stop は 1 回だけ
        // given (前提条件):
        let mut session = session();
        let mut rx = open(&mut session);
        let now = Instant::now();
        session.handle_input(InputEvent::Keystroke, now);

        // when (操作):
        session.handle_input(InputEvent::Blur, now);
        session.on_typing_timeout(now + Duration::from_secs(3));

        // then (期待する結果):
        assert_eq!(sent_types(&mut rx), vec!["typing_start", "typing_stop"]);
    }

    #[test]
    fn test_idle_timeout_emits_stop() {
        // テスト項目: アイドルタイマーの発火で typing_stop が送られる
        // given (前提条件):
        let mut session = session();
        let mut rx = open(&mut session);
        let now = Instant::now();
        session.handle_input(InputEvent::Keystroke, now);

        // when (操作):
        session.on_typing_timeout(now + Duration::from_secs(3));

        // then (期待する結果):
        assert_eq!(sent_types(&mut rx), vec!["typing_start", "typing_stop"]);
        assert_eq!(session.typing_deadline(), None);
    }

    #[test]
    fn test_keystroke_before_open_does_not_start_typing() {
        // テスト項目: 接続前のキー入力では typing_start が送られない
        // given (前提条件):
        let mut session = session();

        // when (操作):
        session.handle_input(InputEvent::Keystroke, Instant::now());

        // then (期待する結果):
        assert_eq!(session.typing().phase(), TypingPhase::Idle);
    }

    #[test]
    fn test_visible_scrolls_to_bottom() {
        // テスト項目: 画面が再表示されると最下部までスクロールされる
        // given (前提条件):
        let mut session = session();
        let before = session.view().scrolls();

        // when (操作):
        session.handle_input(InputEvent::Hidden, Instant::now());
        session.handle_input(InputEvent::Visible, Instant::now());

        // then (期待する結果):
        assert_eq!(session.view().scrolls(), before + 1);
    }

    #[test]
    fn test_hidden_view_sends_no_receipt_under_when_visible_policy() {
        // テスト項目: WhenVisible では非表示中に受信したメッセージに既読通知を送らない
        // given (前提条件):
        let config = config().with_read_receipts(ReadReceiptPolicy::WhenVisible);
        let mut session = ChatSession::with_clock(
            &config,
            InMemoryView::new(),
            Box::new(FixedClock::from_millis(0)),
        );
        let mut rx = open(&mut session);
        let frame = |id: &str| {
            serde_json::json!({
                "type": "chat_message",
                "message_id": id,
                "sender_id": 2,
                "username": "bob",
                "message": "hi",
            })
            .to_string()
        };

        // when (操作):
        session.handle_input(InputEvent::Hidden, Instant::now());
        session.handle_transport_event(TransportEvent::Frame(frame("m1")));
        let sent_while_hidden = sent_types(&mut rx);
        session.handle_input(InputEvent::Visible, Instant::now());
        session.handle_transport_event(TransportEvent::Frame(frame("m2")));
        let sent_while_visible = sent_types(&mut rx);

        // then (期待する結果): 再表示後も m1 の既読はまとめて送られない
        assert!(sent_while_hidden.is_empty());
        assert_eq!(sent_while_visible, vec!["message_read"]);
        assert_eq!(session.view().messages().len(), 2);
    }

    #[test]
    fn test_shutdown_sends_leave_when_open() {
        // テスト項目: 接続中に終了すると user_left フレームが送られる
        // given (前提条件):
        let mut session = session();
        let mut rx = open(&mut session);

        // when (操作):
        session.shutdown();

        // then (期待する結果):
        let value: serde_json::Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "type": "user_left",
                "room_name": "alice-bob",
                "user_id": "1",
                "username": "alice"
            })
        );
    }

    #[test]
    fn test_shutdown_while_closed_sends_nothing() {
        // テスト項目: 切断中に終了しても何も送られない
        // given (前提条件):
        let mut session = session();
        let mut rx = open(&mut session);
        session.handle_transport_event(TransportEvent::Closed {
            code: 1006,
            reason: String::new(),
        });

        // when (操作):
        session.shutdown();

        // then (期待する結果):
        assert!(rx.try_recv().is_err());
    }
}
