//! Concrete rendering surfaces implementing [`crate::domain::ViewPort`].
//!
//! - `terminal`: line-oriented output for the CLI client
//! - `inmemory`: retained model of the view, for tests and embedding

pub mod formatter;
pub mod inmemory;
pub mod terminal;

pub use inmemory::{Entry, InMemoryView};
pub use terminal::TerminalView;
