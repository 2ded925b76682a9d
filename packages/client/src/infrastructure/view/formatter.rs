//! Message formatting utilities for terminal display.

use crate::domain::{MessageView, ReadStatus};

/// Message formatter for terminal display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a chat message line
    ///
    /// # Arguments
    ///
    /// * `message` - The projected message
    ///
    /// # Returns
    ///
    /// A formatted string such as `[13:45] bob: hi` or `[13:46] me: hello ✓`
    pub fn format_chat_message(message: &MessageView) -> String {
        let author = if message.is_own {
            Some("me")
        } else {
            message.sender_label.as_deref()
        };
        let author = author.map(|name| format!("{}: ", name)).unwrap_or_default();

        let content = if message.is_placeholder {
            format!("({})", message.content)
        } else {
            message.content.clone()
        };

        let status = match message.status {
            Some(status) => format!(" {}", Self::format_status(status)),
            None => String::new(),
        };

        format!("\n[{}] {}{}{}\n", message.time, author, content, status)
    }

    /// Format the read status indicator
    pub fn format_status(status: ReadStatus) -> &'static str {
        match status {
            ReadStatus::Sent => "✓",
            ReadStatus::Read => "✓✓",
        }
    }

    /// Format a system notice
    ///
    /// # Arguments
    ///
    /// * `text` - The notice text
    /// * `is_error` - Whether the notice reports an error
    pub fn format_system(text: &str, is_error: bool) -> String {
        let marker = if is_error { "!" } else { "*" };
        format!("\n{} {}\n", marker, text)
    }

    /// Format the notification that an own message was read
    pub fn format_read_receipt(message_id: &str) -> String {
        format!("\n{} message {} was read\n", Self::format_status(ReadStatus::Read), message_id)
    }

    /// Format a user's online status
    pub fn format_user_status(name: &str, online: bool) -> String {
        let (marker, label) = if online {
            ("●", "Online")
        } else {
            ("○", "Offline")
        };
        format!("\n{} {} is {}\n", marker, name, label)
    }

    /// Format the aggregate online count
    pub fn format_online_count(count: usize) -> String {
        format!("\n[{} online]\n", count)
    }

    /// Format the partner status of a private room
    pub fn format_partner_status(online: bool) -> String {
        format!("\n[partner {}]\n", if online { "Online" } else { "Offline" })
    }

    /// Format the typing banner
    pub fn format_typing(text: &str) -> String {
        format!("\n… {}\n", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageId;

    fn message(is_own: bool, sender_label: Option<&str>) -> MessageView {
        MessageView {
            message_id: Some(MessageId::new("m1")),
            is_own,
            sender_label: sender_label.map(str::to_string),
            content: "hi".to_string(),
            is_placeholder: false,
            time: "13:45".to_string(),
            status: is_own.then_some(ReadStatus::Sent),
        }
    }

    #[test]
    fn test_format_received_group_message() {
        // テスト項目: グループの受信メッセージには送信者名が表示される
        // given (前提条件):
        let msg = message(false, Some("bob"));

        // when (操作):
        let result = MessageFormatter::format_chat_message(&msg);

        // then (期待する結果):
        assert_eq!(result, "\n[13:45] bob: hi\n");
    }

    #[test]
    fn test_format_received_private_message() {
        // テスト項目: 送信者名がないメッセージは本文のみ表示される
        // given (前提条件):
        let msg = message(false, None);

        // when (操作):
        let result = MessageFormatter::format_chat_message(&msg);

        // then (期待する結果):
        assert_eq!(result, "\n[13:45] hi\n");
    }

    #[test]
    fn test_format_own_message_with_status() {
        // テスト項目: 自分のメッセージには送信ステータスが付く
        // given (前提条件):
        let msg = message(true, None);

        // when (操作):
        let result = MessageFormatter::format_chat_message(&msg);

        // then (期待する結果):
        assert_eq!(result, "\n[13:45] me: hi ✓\n");
    }

    #[test]
    fn test_format_placeholder() {
        // テスト項目: プレースホルダーは括弧で囲まれて表示される
        // given (前提条件):
        let msg = MessageView {
            content: "Empty message".to_string(),
            is_placeholder: true,
            ..message(false, None)
        };

        // when (操作):
        let result = MessageFormatter::format_chat_message(&msg);

        // then (期待する結果):
        assert!(result.contains("(Empty message)"));
    }

    #[test]
    fn test_format_system() {
        // テスト項目: システムメッセージとエラーが区別して表示される
        // given (前提条件):
        let text = "Connected to chat";

        // when (操作):
        let notice = MessageFormatter::format_system(text, false);
        let error = MessageFormatter::format_system("Error: Invalid JSON", true);

        // then (期待する結果):
        assert_eq!(notice, "\n* Connected to chat\n");
        assert_eq!(error, "\n! Error: Invalid JSON\n");
    }

    #[test]
    fn test_format_user_status() {
        // テスト項目: ユーザーのオンライン状態が表示される
        // given (前提条件):
        let name = "bob";

        // when (操作):
        let online = MessageFormatter::format_user_status(name, true);
        let offline = MessageFormatter::format_user_status(name, false);

        // then (期待する結果):
        assert!(online.contains("bob is Online"));
        assert!(offline.contains("bob is Offline"));
    }
}
