//! WebSocket connection handler.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    domain::{DisplayName, RoomName},
    infrastructure::transport::WebSocketTransport,
    ui::state::{AppState, ConnectQuery},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Reject obviously bad requests before upgrading; the coordinator
    // validates the name again after the handshake.
    if let Err(e) = DisplayName::try_from(query.name.clone()) {
        tracing::warn!("Rejecting WebSocket upgrade: {}", e);
        return Err(StatusCode::BAD_REQUEST);
    }

    let room_name = match query.room {
        Some(room) => match RoomName::try_from(room.clone()) {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!("Invalid room name '{}': {}", room, e);
                return Err(StatusCode::BAD_REQUEST);
            }
        },
        None => state.default_room.clone(),
    };

    let display_name = query.name;
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, display_name, room_name)))
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    display_name: String,
    room_name: RoomName,
) {
    let transport = WebSocketTransport::new(socket);

    match state
        .coordinator
        .attach(transport, &display_name, &room_name)
    {
        Ok(session) => {
            session.connection.closed().await;
            tracing::info!(
                "Session '{}' ({}) ended",
                session.connection.session_id(),
                session.user.display_name
            );
        }
        Err(e) => {
            tracing::warn!("Could not attach '{}' to '{}': {}", display_name, room_name, e);
        }
    }
}
