//! Terminal input: a blocking rustyline loop on its own thread.
//!
//! Every key press is reported as [`InputEvent::Keystroke`] through an
//! `Event::Any` handler, and each entered line as [`InputEvent::Submit`].
//! Leaving the prompt (Ctrl+C / Ctrl+D) reports a blur and closes the channel.

use rustyline::{
    Cmd, ConditionalEventHandler, DefaultEditor, Event, EventContext, EventHandler, KeyCode,
    KeyEvent, RepeatCount, error::ReadlineError,
};
use tokio::sync::mpsc;

use crate::usecase::InputEvent;

use super::error::ClientError;

struct KeystrokeHandler {
    input_tx: mpsc::UnboundedSender<InputEvent>,
}

impl ConditionalEventHandler for KeystrokeHandler {
    fn handle(
        &self,
        evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        _ctx: &EventContext,
    ) -> Option<Cmd> {
        // Enter submits; it is not typing.
        if !matches!(evt.get(0), Some(KeyEvent(KeyCode::Enter, _))) {
            let _ = self.input_tx.send(InputEvent::Keystroke);
        }
        None
    }
}

/// Spawn the readline thread feeding `input_tx`.
pub fn spawn_input_thread(
    username: &str,
    input_tx: mpsc::UnboundedSender<InputEvent>,
) -> Result<std::thread::JoinHandle<()>, ClientError> {
    let prompt = format!("{}> ", username);

    std::thread::Builder::new()
        .name("readline".to_string())
        .spawn(move || read_lines(&prompt, input_tx))
        .map_err(|e| ClientError::Input(e.to_string()))
}

fn read_lines(prompt: &str, input_tx: mpsc::UnboundedSender<InputEvent>) {
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            tracing::error!("Failed to initialize readline: {}", e);
            return;
        }
    };
    rl.bind_sequence(
        Event::Any,
        EventHandler::Conditional(Box::new(KeystrokeHandler {
            input_tx: input_tx.clone(),
        })),
    );

    if input_tx.send(InputEvent::Focus).is_err() {
        return;
    }

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line).ok();
                if input_tx.send(InputEvent::Submit(line.to_string())).is_err() {
                    // Session ended
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                tracing::info!("Interrupted");
                break;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                tracing::info!("EOF");
                break;
            }
            Err(err) => {
                tracing::error!("Readline error: {}", err);
                break;
            }
        }
    }

    let _ = input_tx.send(InputEvent::Blur);
}
