//! Shared application state for the axum handlers.

use std::{sync::Arc, time::Duration};

use serde::Deserialize;

use crate::{
    domain::{RoomName, RoomRegistry, UserDirectory},
    usecase::{CreateRoomUseCase, RoomQueryUseCase, SessionCoordinator},
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Display name to authenticate as
    #[serde(default)]
    pub name: String,
    /// Room to join; the configured default room when absent
    pub room: Option<String>,
}

/// Shared application state
pub struct AppState {
    pub coordinator: SessionCoordinator,
    pub queries: RoomQueryUseCase,
    pub create_room: CreateRoomUseCase,
    pub default_room: RoomName,
    /// Age after which an empty room is reclaimed
    pub empty_room_ttl: Duration,
}

impl AppState {
    pub fn new(
        registry: Arc<RoomRegistry>,
        directory: Arc<dyn UserDirectory>,
        default_room: RoomName,
        empty_room_ttl: Duration,
    ) -> Self {
        Self {
            coordinator: SessionCoordinator::new(registry.clone(), directory.clone()),
            queries: RoomQueryUseCase::new(registry.clone(), directory),
            create_room: CreateRoomUseCase::new(registry),
            default_room,
            empty_room_ttl,
        }
    }

    pub fn registry(&self) -> &Arc<RoomRegistry> {
        self.coordinator.registry()
    }
}
