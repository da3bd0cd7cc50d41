//! axum WebSocket transport.

use async_trait::async_trait;
use axum::extract::ws::{CloseFrame, Message, WebSocket, close_code};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};

use crate::domain::{MessageSink, MessageSource, Transport, TransportError};

/// An upgraded WebSocket, ready to be wrapped in a `Connection`.
pub struct WebSocketTransport {
    socket: WebSocket,
}

impl WebSocketTransport {
    pub fn new(socket: WebSocket) -> Self {
        Self { socket }
    }
}

impl Transport for WebSocketTransport {
    type Sink = WebSocketSink;
    type Source = WebSocketSource;

    fn split(self) -> (Self::Sink, Self::Source) {
        let (sink, stream) = self.socket.split();
        (WebSocketSink { sink }, WebSocketSource { stream })
    }
}

pub struct WebSocketSink {
    sink: SplitSink<WebSocket, Message>,
}

#[async_trait]
impl MessageSink for WebSocketSink {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.sink
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| TransportError::Io(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        let frame = CloseFrame {
            code: close_code::NORMAL,
            reason: "".into(),
        };
        self.sink
            .send(Message::Close(Some(frame)))
            .await
            .map_err(|e| TransportError::Io(e.to_string()))?;
        self.sink
            .close()
            .await
            .map_err(|e| TransportError::Io(e.to_string()))
    }
}

pub struct WebSocketSource {
    stream: SplitStream<WebSocket>,
}

#[async_trait]
impl MessageSource for WebSocketSource {
    async fn next_text(&mut self) -> Result<Option<String>, TransportError> {
        loop {
            let Some(frame) = self.stream.next().await else {
                return Ok(None);
            };

            match frame.map_err(|e| TransportError::Io(e.to_string()))? {
                Message::Text(text) => return Ok(Some(text.as_str().to_owned())),
                Message::Binary(bytes) => match String::from_utf8(bytes.to_vec()) {
                    Ok(text) => return Ok(Some(text)),
                    Err(_) => {
                        tracing::warn!("Dropping non UTF-8 binary frame ({} bytes)", bytes.len());
                    }
                },
                Message::Close(frame) => {
                    if let Some(frame) = frame {
                        tracing::debug!("Peer sent close frame (code {})", frame.code);
                    }
                    return Ok(None);
                }
                // Ping/pong is answered by axum itself.
                Message::Ping(_) | Message::Pong(_) => {}
            }
        }
    }
}
