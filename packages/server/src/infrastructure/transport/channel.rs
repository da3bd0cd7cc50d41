//! In-memory transport over unbounded tokio channels.
//!
//! The server side is a [`ChannelTransport`]; the test or embedding side
//! drives it through the matching [`ChannelPeer`].

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{MessageSink, MessageSource, Transport, TransportError};

type Inbound = Result<String, TransportError>;

/// Create a connected transport/peer pair.
pub fn channel_transport() -> (ChannelTransport, ChannelPeer) {
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

    (
        ChannelTransport {
            sink: ChannelSink {
                outbound: Some(outbound_tx),
            },
            source: ChannelSource { inbound: inbound_rx },
        },
        ChannelPeer {
            inbound: Some(inbound_tx),
            outbound: Some(outbound_rx),
        },
    )
}

pub struct ChannelTransport {
    sink: ChannelSink,
    source: ChannelSource,
}

impl Transport for ChannelTransport {
    type Sink = ChannelSink;
    type Source = ChannelSource;

    fn split(self) -> (Self::Sink, Self::Source) {
        (self.sink, self.source)
    }
}

pub struct ChannelSink {
    outbound: Option<mpsc::UnboundedSender<String>>,
}

#[async_trait]
impl MessageSink for ChannelSink {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        let outbound = self.outbound.as_ref().ok_or(TransportError::Closed)?;
        outbound.send(text).map_err(|_| TransportError::Closed)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        // Dropping the sender ends the peer's stream once it is drained.
        self.outbound.take();
        Ok(())
    }
}

pub struct ChannelSource {
    inbound: mpsc::UnboundedReceiver<Inbound>,
}

#[async_trait]
impl MessageSource for ChannelSource {
    async fn next_text(&mut self) -> Result<Option<String>, TransportError> {
        match self.inbound.recv().await {
            Some(Ok(text)) => Ok(Some(text)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }
}

/// The client end of a [`ChannelTransport`].
pub struct ChannelPeer {
    inbound: Option<mpsc::UnboundedSender<Inbound>>,
    outbound: Option<mpsc::UnboundedReceiver<String>>,
}

impl ChannelPeer {
    /// Send a text message to the server side. Returns `false` once closed.
    pub fn send(&self, text: impl Into<String>) -> bool {
        self.inbound
            .as_ref()
            .is_some_and(|inbound| inbound.send(Ok(text.into())).is_ok())
    }

    /// Make the server side's next read fail.
    pub fn fail(&self, reason: impl Into<String>) {
        if let Some(inbound) = &self.inbound {
            let _ = inbound.send(Err(TransportError::Io(reason.into())));
        }
    }

    /// Close the peer's sending direction, like a client-initiated close.
    pub fn close(&mut self) {
        self.inbound.take();
    }

    /// Stop receiving, so that further server writes fail.
    pub fn drop_receiver(&mut self) {
        self.outbound.take();
    }

    /// Next message written by the server; `None` once it closed the transport.
    pub async fn recv(&mut self) -> Option<String> {
        match self.outbound.as_mut() {
            Some(outbound) => outbound.recv().await,
            None => None,
        }
    }

    /// Non-blocking variant of [`ChannelPeer::recv`].
    pub fn try_recv(&mut self) -> Option<String> {
        self.outbound.as_mut()?.try_recv().ok()
    }
}
