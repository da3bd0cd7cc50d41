//! Terminal client for the roomcast chat server.
//!
//! Lines typed at the prompt are sent as text frames; every text frame the
//! server pushes is printed as-is, since the server already formats them.

use futures_util::{SinkExt, StreamExt};
use rustyline::{DefaultEditor, error::ReadlineError};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

/// Typing this leaves the room.
pub const QUIT_COMMAND: &str = "/quit";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },

    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to start line editor: {0}")]
    Editor(#[from] ReadlineError),
}

/// Build the `/ws` endpoint URL for `base`, `name` and `room`.
pub fn build_ws_url(base: &str, name: &str, room: Option<&str>) -> Result<String, ClientError> {
    let mut url = Url::parse(base)?;
    let path = format!("{}/ws", url.path().trim_end_matches('/'));
    url.set_path(&path);
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("name", name);
        if let Some(room) = room {
            query.append_pair("room", room);
        }
    }
    Ok(url.into())
}

/// Connect, then pump stdin lines out and server lines to stdout until
/// either side ends the session.
pub async fn run_client(url: &str) -> Result<(), ClientError> {
    let (ws, _) = connect_async(url)
        .await
        .map_err(|source| ClientError::Connect {
            url: url.to_string(),
            source,
        })?;
    tracing::info!("Connected to {}", url);

    let (mut sink, mut stream) = ws.split();
    let mut editor = DefaultEditor::new()?;
    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();

    // rustyline blocks, so it gets its own detached thread.
    std::thread::spawn(move || {
        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = editor.add_history_entry(line.as_str());
                    if line == QUIT_COMMAND || line_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    tracing::error!("Input error: {}", e);
                    break;
                }
            }
        }
    });

    let mut send_task = tokio::spawn(async move {
        while let Some(line) = line_rx.recv().await {
            if let Err(e) = sink.send(Message::Text(line.into())).await {
                tracing::error!("Failed to send message: {}", e);
                return;
            }
        }
        let _ = sink.send(Message::Close(None)).await;
        let _ = sink.close().await;
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(frame) = stream.next().await {
            match frame {
                Ok(Message::Text(text)) => println!("{}", text.as_str()),
                Ok(Message::Close(_)) => {
                    println!("Disconnected by server");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("Connection error: {}", e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            // Let the close handshake finish.
            let _ = tokio::time::timeout(std::time::Duration::from_secs(1), &mut recv_task).await;
            recv_task.abort();
        }
        _ = &mut recv_task => send_task.abort(),
    }

    tracing::info!("Session ended");
    Ok(())
}
