//! UseCase layer: the chat session and the operations it performs.

pub mod renderer;
mod router;
mod send_message;
pub mod session;

pub use renderer::MessageRenderer;
pub use session::{ChatSession, InputEvent};
