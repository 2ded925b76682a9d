//! InMemory ViewPort 実装
//!
//! ドメイン層が定義する ViewPort trait の具体的な実装。
//! 描画内容をそのまま保持するので、テストから状態を検査できます。

use std::collections::{HashMap, HashSet};

use crate::domain::{MessageId, MessageView, ReadStatus, Region, UserId, ViewPort};

/// One line of the message list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Message(MessageView),
    System { text: String, is_error: bool },
}

/// インメモリ ViewPort 実装
///
/// Regions listed as missing silently swallow writes, like a page that lacks
/// the corresponding element.
#[derive(Debug, Clone, Default)]
pub struct InMemoryView {
    missing: HashSet<Region>,
    entries: Vec<Entry>,
    typing_banner: Option<String>,
    user_status: HashMap<UserId, bool>,
    online_count: Option<usize>,
    partner_status: Option<bool>,
    scrolls: usize,
}

impl InMemoryView {
    /// View providing every region.
    pub fn new() -> Self {
        Self::default()
    }

    /// View lacking the given regions.
    pub fn without(regions: &[Region]) -> Self {
        Self {
            missing: regions.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Rendered chat messages, in order.
    pub fn messages(&self) -> Vec<&MessageView> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                Entry::Message(message) => Some(message),
                Entry::System { .. } => None,
            })
            .collect()
    }

    /// Rendered system lines as `(text, is_error)`, in order.
    pub fn system_lines(&self) -> Vec<(&str, bool)> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                Entry::System { text, is_error } => Some((text.as_str(), *is_error)),
                Entry::Message(_) => None,
            })
            .collect()
    }

    pub fn typing_banner(&self) -> Option<&str> {
        self.typing_banner.as_deref()
    }

    pub fn user_status(&self, user_id: &UserId) -> Option<bool> {
        self.user_status.get(user_id).copied()
    }

    pub fn online_count(&self) -> Option<usize> {
        self.online_count
    }

    pub fn partner_status(&self) -> Option<bool> {
        self.partner_status
    }

    /// Number of times the list was scrolled to the bottom.
    pub fn scrolls(&self) -> usize {
        self.scrolls
    }

    fn provides(&self, region: Region) -> bool {
        !self.missing.contains(&region)
    }
}

impl ViewPort for InMemoryView {
    fn has_region(&self, region: Region) -> bool {
        self.provides(region)
    }

    fn append_message(&mut self, message: &MessageView) {
        if self.provides(Region::Messages) {
            self.entries.push(Entry::Message(message.clone()));
        }
    }

    fn append_system(&mut self, text: &str, is_error: bool) {
        if self.provides(Region::Messages) {
            self.entries.push(Entry::System {
                text: text.to_string(),
                is_error,
            });
        }
    }

    fn mark_read(&mut self, message_id: &MessageId) -> bool {
        let mut found = false;
        for entry in &mut self.entries {
            if let Entry::Message(message) = entry
                && message.message_id.as_ref() == Some(message_id)
            {
                found = true;
                if message.status.is_some() {
                    message.status = Some(ReadStatus::Read);
                }
            }
        }
        found
    }

    fn scroll_to_bottom(&mut self) {
        if self.provides(Region::Messages) {
            self.scrolls += 1;
        }
    }

    fn show_typing(&mut self, text: &str) {
        if self.provides(Region::TypingIndicator) {
            self.typing_banner = Some(text.to_string());
        }
    }

    fn hide_typing(&mut self) {
        self.typing_banner = None;
    }

    fn set_user_status(&mut self, user_id: &UserId, online: bool) {
        if self.provides(Region::UserStatus) {
            self.user_status.insert(user_id.clone(), online);
        }
    }

    fn set_online_count(&mut self, count: usize) {
        if self.provides(Region::OnlineCount) {
            self.online_count = Some(count);
        }
    }

    fn set_partner_status(&mut self, online: bool) {
        if self.provides(Region::PartnerStatus) {
            self.partner_status = Some(online);
        }
    }
}
