//! Presence tracking for a single room.
//!
//! Membership follows the most recent event received. There is no ordering or
//! timestamp check: inbound events are trusted in arrival order.

use std::collections::{BTreeSet, HashSet};

use super::{
    entity::UserIdentity,
    value_object::{RoomKind, UserId},
    view::ViewPort,
};

/// Point-in-time copy of the online set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceSnapshot {
    pub count: usize,
    pub online: BTreeSet<UserId>,
}

/// Tracks which users of the room are online.
#[derive(Debug, Clone)]
pub struct PresenceTracker {
    room_kind: RoomKind,
    /// Participants other than the local user
    partners: Vec<UserId>,
    online: HashSet<UserId>,
}

impl PresenceTracker {
    pub fn new(local_user: &UserId, room_kind: RoomKind, participants: &[UserIdentity]) -> Self {
        let partners = participants
            .iter()
            .filter(|participant| &participant.id != local_user)
            .map(|participant| participant.id.clone())
            .collect();

        Self {
            room_kind,
            partners,
            online: HashSet::new(),
        }
    }

    /// Mark a single user online or offline.
    ///
    /// Returns `true` if membership changed.
    pub fn set_online(&mut self, user_id: &UserId, online: bool) -> bool {
        if online {
            self.online.insert(user_id.clone())
        } else {
            self.online.remove(user_id)
        }
    }

    /// Replace the whole online set.
    ///
    /// Returns the ids whose membership changed, sorted.
    pub fn replace_all(&mut self, user_ids: impl IntoIterator<Item = UserId>) -> Vec<UserId> {
        let next: HashSet<UserId> = user_ids.into_iter().collect();
        let mut changed: Vec<UserId> = self
            .online
            .symmetric_difference(&next)
            .cloned()
            .collect();
        changed.sort();
        self.online = next;
        changed
    }

    pub fn is_online(&self, user_id: &UserId) -> bool {
        self.online.contains(user_id)
    }

    pub fn snapshot(&self) -> PresenceSnapshot {
        let online: BTreeSet<UserId> = self.online.iter().cloned().collect();
        PresenceSnapshot {
            count: online.len(),
            online,
        }
    }

    /// Whether the other party of a private room is online.
    ///
    /// `None` for group rooms, which only expose the aggregate count.
    pub fn partner_online(&self) -> Option<bool> {
        match self.room_kind {
            RoomKind::Private => Some(self.partners.iter().any(|id| self.online.contains(id))),
            RoomKind::Group => None,
        }
    }

    /// Project the status of one user onto the view.
    pub fn render_user(&self, user_id: &UserId, view: &mut dyn ViewPort) {
        view.set_user_status(user_id, self.is_online(user_id));
    }

    /// Project the aggregate count and partner status onto the view.
    pub fn render_summary(&self, view: &mut dyn ViewPort) {
        view.set_online_count(self.online.len());
        if let Some(partner_online) = self.partner_online() {
            view.set_partner_status(partner_online);
        }
    }
}
