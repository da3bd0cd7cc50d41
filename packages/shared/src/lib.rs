//! Utilities shared by the roomcast server and client binaries.

pub mod logger;
pub mod time;
