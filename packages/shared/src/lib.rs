//! Utilities shared by the CipherTalk packages.

pub mod logger;
pub mod time;
