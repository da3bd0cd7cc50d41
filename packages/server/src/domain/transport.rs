//! Transport seam.
//!
//! A transport is an already-accepted, message-framed duplex channel. The
//! domain only needs to push text out, pull text in, and close it; framing,
//! handshakes and keep-alives stay in the infrastructure implementations.

use async_trait::async_trait;

use super::error::TransportError;

/// Outbound half of a transport. Not safe for concurrent writers; the
/// connection's write worker is its only user.
#[async_trait]
pub trait MessageSink: Send + 'static {
    /// Write one text message.
    async fn send_text(&mut self, text: String) -> Result<(), TransportError>;

    /// Start a graceful close of the channel.
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Inbound half of a transport.
#[async_trait]
pub trait MessageSource: Send + 'static {
    /// Wait for the next application text message.
    ///
    /// `Ok(None)` means the peer closed the channel gracefully.
    async fn next_text(&mut self) -> Result<Option<String>, TransportError>;
}

/// A duplex channel that can be split into independently driven halves.
pub trait Transport: Send + 'static {
    type Sink: MessageSink;
    type Source: MessageSource;

    fn split(self) -> (Self::Sink, Self::Source);
}
