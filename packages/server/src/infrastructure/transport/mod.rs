//! Transport implementations.
//!
//! - `websocket`: axum WebSocket, used by the HTTP server
//! - `channel`: in-memory pair of tokio channels, for tests and embedding

pub mod channel;
pub mod websocket;

pub use channel::{ChannelPeer, ChannelSink, ChannelSource, ChannelTransport, channel_transport};
pub use websocket::WebSocketTransport;
