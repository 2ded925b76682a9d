//! Terminal front end: input thread and the session driver.

mod error;
mod input;
mod runner;

pub use error::ClientError;
pub use runner::{drive, run_client};
