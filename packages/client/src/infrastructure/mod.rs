//! Infrastructure layer: wire format, WebSocket transport and concrete views.

pub mod dto;
pub mod transport;
pub mod view;
