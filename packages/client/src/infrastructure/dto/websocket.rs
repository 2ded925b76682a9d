//! WebSocket frame DTOs for the chat protocol.
//!
//! Every frame is a JSON object discriminated by its `type` field.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{MessageId, UserId};

/// Errors raised while decoding an inbound frame
#[derive(Debug, Error)]
pub enum FrameError {
    /// Payload is not JSON or does not match the frame shape
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Frame received from the server
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundFrame {
    ChatMessage(ChatMessageFrame),
    UserJoined(MembershipFrame),
    UserLeft(MembershipFrame),
    UserPresence(UserPresenceFrame),
    TypingIndicator(TypingIndicatorFrame),
    MessageRead(MessageReadFrame),
    OnlineUsers(OnlineUsersFrame),
    Error(ErrorFrame),
    /// Any discriminant this client does not know about
    #[serde(other)]
    Unknown,
}

impl InboundFrame {
    /// Parse a text payload into a frame.
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Wire name of the frame type, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ChatMessage(_) => "chat_message",
            Self::UserJoined(_) => "user_joined",
            Self::UserLeft(_) => "user_left",
            Self::UserPresence(_) => "user_presence",
            Self::TypingIndicator(_) => "typing_indicator",
            Self::MessageRead(_) => "message_read",
            Self::OnlineUsers(_) => "online_users",
            Self::Error(_) => "error",
            Self::Unknown => "unknown",
        }
    }
}

/// Chat message broadcast by the server
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatMessageFrame {
    #[serde(default)]
    pub message_id: Option<MessageId>,
    pub sender_id: UserId,
    #[serde(default)]
    pub username: Option<String>,
    /// Name field used by the server broadcast
    #[serde(default)]
    pub sender_username: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub encrypted_content: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub is_read: bool,
}

impl ChatMessageFrame {
    /// Display name of the sender, whichever field carries it.
    pub fn sender_name(&self) -> Option<&str> {
        [&self.username, &self.sender_username]
            .into_iter()
            .filter_map(|name| name.as_deref())
            .find(|name| !name.is_empty())
    }
}

/// `user_joined` / `user_left` notification
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MembershipFrame {
    pub user_id: UserId,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Online status change of a single user
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserPresenceFrame {
    pub user_id: UserId,
    pub online: bool,
}

/// Remote typing start/stop
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TypingIndicatorFrame {
    pub user_id: UserId,
    #[serde(default)]
    pub username: Option<String>,
    pub typing: bool,
}

/// Read receipt for a message
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessageReadFrame {
    #[serde(default)]
    pub message_id: Option<MessageId>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Full list of users currently online
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OnlineUsersFrame {
    #[serde(default)]
    pub users: Vec<UserId>,
}

/// Error reported by the server
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorFrame {
    #[serde(default)]
    pub error: String,
}

/// Frame sent to the server
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundFrame {
    ChatMessage {
        message: String,
        room_name: String,
        sender_id: UserId,
        username: String,
    },
    TypingStart {
        room_name: String,
    },
    TypingStop {
        room_name: String,
    },
    MessageRead {
        message_id: MessageId,
        room_name: String,
    },
    UserLeft {
        room_name: String,
        user_id: UserId,
        username: String,
    },
}

impl OutboundFrame {
    /// Serialize the frame to its JSON text.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_chat_message_from_server_broadcast() {
        // テスト項目: サーバーのブロードキャスト形式のチャットメッセージが解析される
        // given (前提条件):
        let text = json!({
            "type": "chat_message",
            "message_id": 12,
            "sender_id": 2,
            "sender_username": "bob",
            "encrypted_content": "gAAAA...",
            "iv": "",
            "timestamp": "2024-05-06T13:45:10+00:00",
            "reply_to": null,
            "self_destruct": false
        })
        .to_string();

        // when (操作):
        let frame = InboundFrame::parse(&text).unwrap();

        // then (期待する結果):
        let InboundFrame::ChatMessage(chat) = frame else {
            panic!("expected chat_message, got {frame:?}");
        };
        assert_eq!(chat.message_id, Some(MessageId::new("12")));
        assert_eq!(chat.sender_id, UserId::new("2"));
        assert_eq!(chat.sender_name(), Some("bob"));
        assert_eq!(chat.message, None);
        assert!(!chat.is_read);
    }

    #[test]
    fn test_parse_unknown_type_is_not_an_error() {
        // テスト項目: 未知の type は Unknown として解析される
        // given (前提条件):
        let text = r#"{"type":"reaction_added","emoji":"+1"}"#;

        // when (操作):
        let frame = InboundFrame::parse(text).unwrap();

        // then (期待する結果):
        assert_eq!(frame, InboundFrame::Unknown);
    }

    #[test]
    fn test_parse_invalid_json_is_malformed() {
        // テスト項目: JSON として不正なペイロードは Malformed エラーになる
        // given (前提条件):
        let text = "{not json";

        // when (操作):
        let result = InboundFrame::parse(text);

        // then (期待する結果):
        assert!(matches!(result, Err(FrameError::Malformed(_))));
    }

    #[test]
    fn test_parse_known_type_missing_fields_is_malformed() {
        // テスト項目: 必須フィールドが欠けた既知の type は Malformed エラーになる
        // given (前提条件):
        let text = r#"{"type":"user_presence","online":true}"#;

        // when (操作):
        let result = InboundFrame::parse(text);

        // then (期待する結果):
        assert!(matches!(result, Err(FrameError::Malformed(_))));
    }

    #[test]
    fn test_parse_online_users() {
        // テスト項目: online_users の ID リストが数値・文字列混在でも解析される
        // given (前提条件):
        let text = r#"{"type":"online_users","users":[1,"2",3]}"#;

        // when (操作):
        let frame = InboundFrame::parse(text).unwrap();

        // then (期待する結果):
        assert_eq!(
            frame,
            InboundFrame::OnlineUsers(OnlineUsersFrame {
                users: vec![UserId::new("1"), UserId::new("2"), UserId::new("3")],
            })
        );
    }

    #[test]
    fn test_serialize_message_read() {
        // テスト項目: 既読通知が type 付きの JSON にシリアライズされる
        // given (前提条件):
        let frame = OutboundFrame::MessageRead {
            message_id: MessageId::new("m1"),
            room_name: "general".to_string(),
        };

        // when (操作):
        let value: serde_json::Value = serde_json::from_str(&frame.to_json().unwrap()).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({"type": "message_read", "message_id": "m1", "room_name": "general"})
        );
    }

    #[test]
    fn test_serialize_typing_start() {
        // テスト項目: typing_start にはルーム名のみが含まれる
        // given (前提条件):
        let frame = OutboundFrame::TypingStart {
            room_name: "dev team".to_string(),
        };

        // when (操作):
        let value: serde_json::Value = serde_json::from_str(&frame.to_json().unwrap()).unwrap();

        // then (期待する結果):
        assert_eq!(value, json!({"type": "typing_start", "room_name": "dev team"}));
    }
}
