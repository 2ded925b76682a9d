//! Client configuration supplied by the hosting layer before start.

use std::time::Duration;

use crate::domain::{
    ConfigError, RoomIdentity, RoomKind, RoomName, UserIdentity, typing::DEFAULT_TYPING_IDLE,
};

/// Fixed delay between a lost connection and the next attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// When read receipts are sent for received messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadReceiptPolicy {
    /// Acknowledge as soon as the message is rendered, visible or not.
    #[default]
    Eager,
    /// Skip acknowledgements while the view reports itself hidden.
    WhenVisible,
}

/// Everything a chat session needs to know about its context.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// `host[:port]` of the chat server
    pub host: String,
    /// Whether the origin is secure (`wss` instead of `ws`)
    pub secure: bool,
    pub room: RoomIdentity,
    pub user: UserIdentity,
    pub participants: Vec<UserIdentity>,
    pub reconnect_delay: Duration,
    pub typing_idle: Duration,
    pub read_receipts: ReadReceiptPolicy,
}

impl ClientConfig {
    /// Validate the required identity fields and build a config with default timings.
    ///
    /// Fails fast on a blank room name, user id, or username.
    pub fn new(
        host: impl Into<String>,
        room_name: &str,
        room_kind: RoomKind,
        user_id: &str,
        username: &str,
    ) -> Result<Self, ConfigError> {
        let room = RoomIdentity {
            name: RoomName::new(room_name)?,
            kind: room_kind,
        };
        let user = UserIdentity::new(user_id, username)?;

        Ok(Self {
            host: host.into(),
            secure: false,
            room,
            user,
            participants: Vec::new(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            typing_idle: DEFAULT_TYPING_IDLE,
            read_receipts: ReadReceiptPolicy::default(),
        })
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_participants(mut self, participants: Vec<UserIdentity>) -> Self {
        self.participants = participants;
        self
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn with_typing_idle(mut self, idle: Duration) -> Self {
        self.typing_idle = idle;
        self
    }

    pub fn with_read_receipts(mut self, policy: ReadReceiptPolicy) -> Self {
        self.read_receipts = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_timings() {
        // テスト項目: 設定のデフォルト値は 3 秒の再接続間隔と 3 秒のアイドル時間
        // given (前提条件):

        // when (操作):
        let config =
            ClientConfig::new("localhost:8000", "general", RoomKind::Group, "1", "alice").unwrap();

        // then (期待する結果):
        assert_eq!(config.reconnect_delay, Duration::from_secs(3));
        assert_eq!(config.typing_idle, Duration::from_secs(3));
        assert_eq!(config.read_receipts, ReadReceiptPolicy::Eager);
        assert!(!config.secure);
    }

    #[test]
    fn test_new_fails_fast_on_missing_identity() {
        // テスト項目: ルーム名・ユーザー ID・ユーザー名のいずれかが空ならエラーになる
        // given (前提条件):
        let host = "localhost:8000";

        // when (操作):
        let no_room = ClientConfig::new(host, "", RoomKind::Group, "1", "alice");
        let no_user = ClientConfig::new(host, "general", RoomKind::Group, "", "alice");
        let no_name = ClientConfig::new(host, "general", RoomKind::Group, "1", "");

        // then (期待する結果):
        assert_eq!(no_room.unwrap_err(), ConfigError::MissingRoomName);
        assert_eq!(no_user.unwrap_err(), ConfigError::MissingUserId);
        assert_eq!(no_name.unwrap_err(), ConfigError::MissingUsername);
    }
}
