//! WebSocket connection task with fixed-interval reconnection.
//!
//! The task owns the socket for its whole life. Each attempt reports
//! `Connecting`, then either `Open` followed by frames, or an `Error`; every
//! attempt ends with exactly one `Closed`, after which the next attempt is
//! scheduled `reconnect_delay` later. Retries never give up. The task stops
//! when the session drops its event receiver or when the handle is shut down.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::{net::TcpStream, sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

/// Close code reported when the connection dropped without a close frame.
pub const ABNORMAL_CLOSURE: u16 = 1006;

/// Close code reported when the server sent a close frame without a status.
pub const NO_STATUS_RECEIVED: u16 = 1005;

const NORMAL_CLOSURE: u16 = 1000;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Socket-level failures. Only ever logged; recovery goes through close and reconnect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection attempt failed
    #[error("connection failed: {0}")]
    Connect(String),

    /// Reading from the socket failed
    #[error("read failed: {0}")]
    Read(String),

    /// Writing to the socket failed
    #[error("write failed: {0}")]
    Write(String),
}

/// Events emitted by the connection task, in order.
#[derive(Debug)]
pub enum TransportEvent {
    /// A connection attempt is starting (1-indexed)
    Connecting { attempt: u64 },
    /// Connection established; frames written to `outgoing` go out on this socket
    Open {
        outgoing: mpsc::UnboundedSender<String>,
    },
    /// Text payload received
    Frame(String),
    /// Connection ended; a reconnect is scheduled
    Closed { code: u16, reason: String },
    /// Socket-level failure; always followed by `Closed`
    Error(TransportError),
}

/// Owner of a running connection task.
///
/// Dropping the handle stops the task as well.
#[derive(Debug)]
pub struct ConnectionHandle {
    task: JoinHandle<()>,
}

impl ConnectionHandle {
    /// Stop the connection task, cancelling any pending reconnect.
    pub fn shutdown(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait up to `timeout` for the task to end on its own.
    ///
    /// Returns `false` if it is still running.
    pub async fn wait(&mut self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, &mut self.task).await.is_ok()
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn the connection task for `url`.
pub fn spawn_connection(
    url: String,
    reconnect_delay: Duration,
    events: mpsc::UnboundedSender<TransportEvent>,
) -> ConnectionHandle {
    install_crypto_provider();
    let task = tokio::spawn(run_connection_loop(url, reconnect_delay, events));
    ConnectionHandle { task }
}

/// Select the rustls backend used for `wss` endpoints.
fn install_crypto_provider() {
    // Errors only when a provider is already installed for the process.
    let _ = rustls::crypto::ring::default_provider().install_default();
}

async fn run_connection_loop(
    url: String,
    reconnect_delay: Duration,
    events: mpsc::UnboundedSender<TransportEvent>,
) {
    let mut attempt = 0;

    loop {
        attempt += 1;
        tracing::info!("Connecting to {} (attempt {})", url, attempt);
        if events.send(TransportEvent::Connecting { attempt }).is_err() {
            break;
        }

        let (code, reason) = match connect_async(url.as_str()).await {
            Ok((socket, _response)) => {
                tracing::info!("Connected to {}", url);
                pump(socket, &events).await
            }
            Err(e) => {
                let _ = events.send(TransportEvent::Error(TransportError::Connect(
                    e.to_string(),
                )));
                (ABNORMAL_CLOSURE, String::new())
            }
        };

        if events
            .send(TransportEvent::Closed { code, reason })
            .is_err()
        {
            break;
        }

        tracing::info!("Reconnecting in {} ms", reconnect_delay.as_millis());
        tokio::time::sleep(reconnect_delay).await;
    }

    tracing::debug!("Connection task for {} stopped", url);
}

/// Shuttle frames between the socket and the session until the socket ends.
///
/// Returns the close code and reason to report.
async fn pump(socket: Socket, events: &mpsc::UnboundedSender<TransportEvent>) -> (u16, String) {
    let (mut write, mut read) = socket.split();
    let (outgoing_tx, mut outgoing_rx) = mpsc::unbounded_channel::<String>();

    if events
        .send(TransportEvent::Open {
            outgoing: outgoing_tx,
        })
        .is_err()
    {
        let _ = write.send(Message::Close(None)).await;
        return (NORMAL_CLOSURE, String::new());
    }

    loop {
        tokio::select! {
            incoming = read.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if events.send(TransportEvent::Frame(text.as_str().to_owned())).is_err() {
                        let _ = write.send(Message::Close(None)).await;
                        return (NORMAL_CLOSURE, String::new());
                    }
                }
                Some(Ok(Message::Binary(data))) => {
                    tracing::debug!("Ignoring {} bytes of binary data", data.len());
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!("Server closed the connection");
                    return frame
                        .map(|f| (u16::from(f.code), f.reason.as_str().to_owned()))
                        .unwrap_or((NO_STATUS_RECEIVED, String::new()));
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    let _ = events.send(TransportEvent::Error(TransportError::Read(e.to_string())));
                    return (ABNORMAL_CLOSURE, String::new());
                }
                None => return (ABNORMAL_CLOSURE, String::new()),
            },
            outgoing = outgoing_rx.recv() => match outgoing {
                Some(json) => {
                    if let Err(e) = write.send(Message::Text(json.into())).await {
                        let _ = events.send(TransportEvent::Error(TransportError::Write(e.to_string())));
                        return (ABNORMAL_CLOSURE, String::new());
                    }
                }
                None => {
                    // Session released the writer: close on our side.
                    let _ = write.send(Message::Close(None)).await;
                    return (NORMAL_CLOSURE, String::new());
                }
            },
        }
    }
}
