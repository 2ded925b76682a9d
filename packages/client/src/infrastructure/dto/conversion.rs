//! Conversion logic between DTOs and domain entities.

use crate::domain::{ChatMessage, MessageBody, UserId};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain Entity
// ========================================

impl dto::ChatMessageFrame {
    /// Build the domain message as seen by `local_user`.
    pub fn to_entity(&self, local_user: &UserId) -> ChatMessage {
        ChatMessage {
            id: self.message_id.clone(),
            sender_id: self.sender_id.clone(),
            sender_name: self.sender_name().map(str::to_string),
            body: MessageBody::select(
                self.message.as_deref(),
                self.encrypted_content.as_deref(),
            ),
            timestamp: self.timestamp.clone(),
            is_own: &self.sender_id == local_user,
            read_by_recipient: self.is_read,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageId;

    fn frame(sender_id: &str) -> dto::ChatMessageFrame {
        dto::ChatMessageFrame {
            message_id: Some(MessageId::new("m1")),
            sender_id: UserId::new(sender_id),
            username: Some("bob".to_string()),
            sender_username: None,
            message: Some("hi".to_string()),
            encrypted_content: Some("cipher".to_string()),
            timestamp: None,
            is_read: true,
        }
    }

    #[test]
    fn test_received_frame_to_entity() {
        // テスト項目: 他ユーザーのメッセージは受信メッセージとして変換される
        // given (前提条件):
        let dto_msg = frame("2");

        // when (操作):
        let entity = dto_msg.to_entity(&UserId::new("1"));

        // then (期待する結果):
        assert!(!entity.is_own);
        assert_eq!(entity.id, Some(MessageId::new("m1")));
        assert_eq!(entity.sender_name.as_deref(), Some("bob"));
        assert_eq!(entity.body, MessageBody::Text("hi".to_string()));
        assert!(entity.read_by_recipient);
    }

    #[test]
    fn test_own_frame_to_entity() {
        // テスト項目: 自分の ID と一致する送信者のメッセージは自分のメッセージになる
        // given (前提条件):
        let dto_msg = frame("1");

        // when (操作):
        let entity = dto_msg.to_entity(&UserId::new("1"));

        // then (期待する結果):
        assert!(entity.is_own);
    }
}
