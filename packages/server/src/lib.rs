//! Room-based WebSocket chat server.
//!
//! Clients connect over WebSocket, authenticate with a display name, join a
//! named room and have every text message they send formatted and delivered
//! to all members of that room.

pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use error::ServerError;
pub use ui::run as run_server;
