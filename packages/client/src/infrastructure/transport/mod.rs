//! Transport to the room socket.
//!
//! Split in two halves:
//!
//! - [`websocket`]: the connection task that owns the socket and reconnects
//! - [`Transport`]: the session-side state that decides whether a send is
//!   permitted and hands frames to the current connection

pub mod endpoint;
pub mod websocket;

use tokio::sync::mpsc;

use crate::infrastructure::dto::websocket::OutboundFrame;

pub use endpoint::{room_endpoint, split_origin};
pub use websocket::{
    ABNORMAL_CLOSURE, ConnectionHandle, NO_STATUS_RECEIVED, TransportError, TransportEvent,
    spawn_connection,
};

/// Lifecycle of the room connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

/// Session-side view of the connection.
///
/// Sends are best effort: a frame handed over while the connection is not
/// open is dropped, and nothing is buffered across reconnects.
#[derive(Debug)]
pub struct Transport {
    state: ConnectionState,
    outgoing: Option<mpsc::UnboundedSender<String>>,
}

impl Transport {
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Connecting,
            outgoing: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    pub fn on_connecting(&mut self) {
        self.state = ConnectionState::Connecting;
        self.outgoing = None;
    }

    /// Attach the writer of a freshly opened connection.
    pub fn on_open(&mut self, outgoing: mpsc::UnboundedSender<String>) {
        self.state = ConnectionState::Open;
        self.outgoing = Some(outgoing);
    }

    pub fn on_close(&mut self) {
        self.state = ConnectionState::Closed;
        self.outgoing = None;
    }

    /// Serialize and transmit a frame if the connection is open.
    ///
    /// Returns `true` if the frame was handed to the connection.
    pub fn send(&self, frame: &OutboundFrame) -> bool {
        let Some(outgoing) = self.outgoing.as_ref().filter(|_| self.is_open()) else {
            tracing::debug!("Dropping outbound frame while {:?}", self.state);
            return false;
        };

        let json = match frame.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize frame: {}", e);
                return false;
            }
        };

        if let Err(e) = outgoing.send(json) {
            tracing::warn!("Connection writer is gone: {}", e);
            return false;
        }
        true
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}
