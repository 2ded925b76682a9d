//! Terminal ViewPort for the CLI client.
//!
//! A terminal cannot rewrite lines it already printed, so state changes
//! (typing banner, statuses, read receipts) are printed as new lines, and only
//! when the displayed value actually changes.

use std::{
    collections::HashMap,
    io::{self, Stdout, Write},
};

use crate::domain::{
    MessageId, MessageView, ReadStatus, Region, UserId, UserIdentity, ViewPort,
};

use super::formatter::MessageFormatter;

pub struct TerminalView<W: Write = Stdout> {
    out: W,
    prompt: String,
    names: HashMap<UserId, String>,
    /// Own messages and whether they have been read
    own_messages: HashMap<MessageId, bool>,
    typing_banner: Option<String>,
    user_status: HashMap<UserId, bool>,
    online_count: Option<usize>,
    partner_status: Option<bool>,
}

impl TerminalView<Stdout> {
    /// Terminal view writing to stdout.
    pub fn stdout(username: &str, participants: &[UserIdentity]) -> Self {
        Self::new(io::stdout(), username, participants)
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, username: &str, participants: &[UserIdentity]) -> Self {
        let names = participants
            .iter()
            .map(|participant| (participant.id.clone(), participant.display_name.clone()))
            .collect();

        Self {
            out,
            prompt: format!("{}> ", username),
            names,
            own_messages: HashMap::new(),
            typing_banner: None,
            user_status: HashMap::new(),
            online_count: None,
            partner_status: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print a block and redisplay the prompt after it.
    fn print(&mut self, text: &str) {
        if let Err(e) = write!(self.out, "{}{}", text, self.prompt).and_then(|()| self.out.flush())
        {
            tracing::warn!("Failed to write to terminal: {}", e);
        }
    }

    fn display_name(&self, user_id: &UserId) -> String {
        self.names
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| format!("user {}", user_id))
    }
}

impl<W: Write> ViewPort for TerminalView<W> {
    fn has_region(&self, _region: Region) -> bool {
        true
    }

    fn append_message(&mut self, message: &MessageView) {
        if message.is_own
            && let Some(id) = &message.message_id
        {
            self.own_messages
                .insert(id.clone(), message.status == Some(ReadStatus::Read));
        }
        let formatted = MessageFormatter::format_chat_message(message);
        self.print(&formatted);
    }

    fn append_system(&mut self, text: &str, is_error: bool) {
        let formatted = MessageFormatter::format_system(text, is_error);
        self.print(&formatted);
    }

    fn mark_read(&mut self, message_id: &MessageId) -> bool {
        match self.own_messages.get_mut(message_id) {
            None => return false,
            Some(true) => return true,
            Some(read) => *read = true,
        }
        let formatted = MessageFormatter::format_read_receipt(message_id.as_str());
        self.print(&formatted);
        true
    }

    fn scroll_to_bottom(&mut self) {
        // Terminal output is always at the bottom.
    }

    fn show_typing(&mut self, text: &str) {
        if self.typing_banner.as_deref() == Some(text) {
            return;
        }
        self.typing_banner = Some(text.to_string());
        let formatted = MessageFormatter::format_typing(text);
        self.print(&formatted);
    }

    fn hide_typing(&mut self) {
        self.typing_banner = None;
    }

    fn set_user_status(&mut self, user_id: &UserId, online: bool) {
        if self.user_status.insert(user_id.clone(), online) == Some(online) {
            return;
        }
        let formatted = MessageFormatter::format_user_status(&self.display_name(user_id), online);
        self.print(&formatted);
    }

    fn set_online_count(&mut self, count: usize) {
        if self.online_count.replace(count) == Some(count) {
            return;
        }
        let formatted = MessageFormatter::format_online_count(count);
        self.print(&formatted);
    }

    fn set_partner_status(&mut self, online: bool) {
        if self.partner_status.replace(online) == Some(online) {
            return;
        }
        let formatted = MessageFormatter::format_partner_status(online);
        self.print(&formatted);
    }
}
