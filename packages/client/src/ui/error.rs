//! Error types for the chat client.

use thiserror::Error;

use crate::domain::ConfigError;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Required context is missing or invalid
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Input handling could not be set up
    #[error("Input error: {0}")]
    Input(String),
}
