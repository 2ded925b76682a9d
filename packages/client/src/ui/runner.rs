//! Client execution logic: wires the connection task, the input thread and
//! the idle timer into one session loop.

use std::{future::Future, time::Duration};

use tokio::{
    sync::mpsc,
    time::{Instant, sleep_until},
};

use crate::{
    config::ClientConfig,
    domain::ViewPort,
    infrastructure::{
        transport::{TransportEvent, room_endpoint, spawn_connection},
        view::TerminalView,
    },
    usecase::{ChatSession, InputEvent},
};

use super::{error::ClientError, input::spawn_input_thread};

/// How long to wait for the leave notice to be flushed on exit.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Run the terminal chat client until the user exits.
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let url = room_endpoint(&config.host, config.secure, &config.room.name);
    tracing::info!(
        "Joining room '{}' as '{}' via {}",
        config.room.name,
        config.user.display_name,
        url
    );

    let view = TerminalView::stdout(&config.user.display_name, &config.participants);
    let mut session = ChatSession::new(&config, view);

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let mut connection = spawn_connection(url, config.reconnect_delay, events_tx);

    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    spawn_input_thread(&config.user.display_name, input_tx)?;

    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    drive(&mut session, &mut events_rx, &mut input_rx, ctrl_c).await;

    session.shutdown();
    // Releasing the writer lets the connection flush and close on its own.
    drop(session);
    drop(events_rx);
    if !connection.wait(SHUTDOWN_GRACE).await {
        connection.shutdown();
    }

    tracing::info!("Client session ended");
    Ok(())
}

/// Feed a session from its event sources until input ends or `shutdown` resolves.
///
/// Events are applied one at a time in arrival order.
pub async fn drive<V, F>(
    session: &mut ChatSession<V>,
    events: &mut mpsc::UnboundedReceiver<TransportEvent>,
    input: &mut mpsc::UnboundedReceiver<InputEvent>,
    shutdown: F,
) where
    V: ViewPort,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        let deadline = session.typing_deadline();

        tokio::select! {
            event = events.recv() => match event {
                Some(event) => session.handle_transport_event(event),
                None => {
                    tracing::warn!("Connection task stopped");
                    break;
                }
            },
            event = input.recv() => match event {
                Some(event) => session.handle_input(event, Instant::now()),
                None => break,
            },
            () = idle_timer(deadline) => {
                session.on_typing_timeout(Instant::now());
            }
            () = &mut shutdown => break,
        }
    }
}

async fn idle_timer(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
