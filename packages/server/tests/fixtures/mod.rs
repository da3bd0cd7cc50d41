//! In-process test server shared by the integration tests.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use roomcast_server::{
    infrastructure::config::ServerConfig,
    ui::{build_state, serve, state::AppState},
};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message,
};

pub const WAIT: Duration = Duration::from_secs(3);

pub type WsClient = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// A server bound to an ephemeral localhost port, stopped on drop.
pub struct TestServer {
    addr: SocketAddr,
    state: Arc<AppState>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    /// Start with `config`, overriding the bind address with an ephemeral
    /// localhost port.
    pub async fn start_with(config: ServerConfig) -> Self {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..config
        };
        let listener = TcpListener::bind(config.bind_address())
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let state = build_state(&config).expect("Failed to build state");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn({
            let state = state.clone();
            async move {
                serve(listener, state, async move {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("Server failed");
            }
        });

        Self {
            addr,
            state,
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self, query: &str) -> String {
        format!("ws://{}/ws?{}", self.addr, query)
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Trigger graceful shutdown and wait for the serve loop to return.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            tokio::time::timeout(WAIT, handle)
                .await
                .expect("Server did not stop in time")
                .expect("Server task panicked");
        }
    }

    /// Connect and read the welcome line.
    pub async fn join(&self, name: &str, room: &str) -> WsClient {
        let (mut ws, _) = connect_async(self.ws_url(&format!("name={name}&room={room}")))
            .await
            .expect("Failed to connect");
        let welcome = next_text(&mut ws).await;
        assert_eq!(welcome, format!("SYSTEM: Welcome to room {room}"));
        ws
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Next text frame, skipping control frames.
pub async fn next_text(ws: &mut WsClient) -> String {
    loop {
        let message = tokio::time::timeout(WAIT, ws.next())
            .await
            .expect("Timed out waiting for a message")
            .expect("Stream ended")
            .expect("WebSocket error");
        match message {
            Message::Text(text) => return text.as_str().to_owned(),
            Message::Close(frame) => panic!("Connection closed: {frame:?}"),
            _ => {}
        }
    }
}

/// Wait until the server closes the socket.
pub async fn expect_closed(ws: &mut WsClient) {
    loop {
        match tokio::time::timeout(WAIT, ws.next())
            .await
            .expect("Timed out waiting for close")
        {
            None | Some(Err(_)) | Some(Ok(Message::Close(_))) => return,
            Some(Ok(Message::Text(text))) => panic!("Unexpected message: {}", text.as_str()),
            Some(Ok(_)) => {}
        }
    }
}

pub async fn send_text(ws: &mut WsClient, text: &str) {
    ws.send(Message::Text(text.into()))
        .await
        .expect("Failed to send");
}

/// Poll `condition` until it holds or the wait expires.
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(WAIT, async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("Condition not reached in time");
}
