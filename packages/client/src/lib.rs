//! Real-time chat client for CipherTalk rooms.
//!
//! The client keeps one WebSocket connection per room, reconciles local
//! state (message list, typing state, online presence) against the server's
//! event stream, and reconnects transparently when the connection drops.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;

pub use config::{ClientConfig, ReadReceiptPolicy};
pub use ui::{ClientError, drive, run_client};
pub use usecase::{ChatSession, InputEvent};
