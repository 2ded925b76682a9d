//! Data Transfer Objects (DTOs) for the chat protocol.
//!
//! - `websocket`: JSON frames exchanged over the room socket
//! - `conversion`: frames to domain entities

pub mod conversion;
pub mod websocket;
