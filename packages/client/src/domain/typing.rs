//! Typing state: the local debounce state machine and the remote banner slot.
//!
//! The coordinator performs no I/O. Transitions return the [`TypingSignal`]
//! to emit, and the caller owns the timer by sleeping until [`TypingCoordinator::deadline`].

use std::time::Duration;

use tokio::time::Instant;

use super::{value_object::UserId, view::ViewPort};

/// Default idle period after the last keystroke before typing stops.
pub const DEFAULT_TYPING_IDLE: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingPhase {
    Idle,
    Typing,
}

/// Signal to send to the server on a phase transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingSignal {
    Start,
    Stop,
}

/// The one remote user currently shown as typing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTypist {
    pub user_id: UserId,
    pub name: String,
}

impl RemoteTypist {
    pub fn banner(&self) -> String {
        format!("{} is typing...", self.name)
    }
}

#[derive(Debug, Clone)]
pub struct TypingCoordinator {
    phase: TypingPhase,
    idle_timeout: Duration,
    deadline: Option<Instant>,
    remote: Option<RemoteTypist>,
}

impl TypingCoordinator {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            phase: TypingPhase::Idle,
            idle_timeout,
            deadline: None,
            remote: None,
        }
    }

    pub fn phase(&self) -> TypingPhase {
        self.phase
    }

    /// When the idle timer fires, if it is armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Handle a keystroke in the message input.
    ///
    /// Emits `Start` only on the Idle to Typing edge, which requires an open
    /// connection. Every keystroke while typing re-arms the idle timer.
    pub fn on_input(&mut self, connected: bool, now: Instant) -> Option<TypingSignal> {
        match self.phase {
            TypingPhase::Typing => {
                self.deadline = Some(now + self.idle_timeout);
                None
            }
            TypingPhase::Idle if connected => {
                self.phase = TypingPhase::Typing;
                self.deadline = Some(now + self.idle_timeout);
                Some(TypingSignal::Start)
            }
            TypingPhase::Idle => None,
        }
    }

    /// Focus alone never starts typing.
    pub fn on_focus(&mut self) -> Option<TypingSignal> {
        None
    }

    /// End typing because the input lost focus or a message was sent.
    pub fn stop(&mut self) -> Option<TypingSignal> {
        self.deadline = None;
        match self.phase {
            TypingPhase::Typing => {
                self.phase = TypingPhase::Idle;
                Some(TypingSignal::Stop)
            }
            TypingPhase::Idle => None,
        }
    }

    /// Handle the idle timer firing at `now`.
    ///
    /// A stale wake-up before the current deadline is ignored.
    pub fn on_timer(&mut self, now: Instant) -> Option<TypingSignal> {
        match self.deadline {
            Some(deadline) if deadline <= now => self.stop(),
            _ => None,
        }
    }

    /// Apply a remote `typing_indicator` event to the single banner slot.
    ///
    /// Our own echo and `typing = false` both clear the slot.
    pub fn on_remote_signal(
        &mut self,
        local_user: &UserId,
        user_id: &UserId,
        name: Option<&str>,
        typing: bool,
    ) -> Option<&RemoteTypist> {
        self.remote = if typing && user_id != local_user {
            Some(RemoteTypist {
                user_id: user_id.clone(),
                name: name.unwrap_or("Someone").to_string(),
            })
        } else {
            None
        };
        self.remote.as_ref()
    }

    pub fn remote(&self) -> Option<&RemoteTypist> {
        self.remote.as_ref()
    }

    /// Project the remote slot onto the view.
    pub fn render_remote(&self, view: &mut dyn ViewPort) {
        match &self.remote {
            Some(typist) => view.show_typing(&typist.banner()),
            None => view.hide_typing(),
        }
    }
}

impl Default for TypingCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_TYPING_IDLE)
    }
}
