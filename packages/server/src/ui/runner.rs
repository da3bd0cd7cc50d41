//! Router construction and the serve loop.

use std::{future::Future, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    domain::{RoomRegistry, UserDirectory},
    error::ServerError,
    infrastructure::{config::ServerConfig, repository::InMemoryUserDirectory},
};

use super::{
    handler::{create_room, get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Build the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms).post(create_room))
        .route("/api/rooms/{room_name}", get(get_room_detail))
        .route("/ws", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build fresh in-memory state for `config`.
pub fn build_state(config: &ServerConfig) -> Result<Arc<AppState>, ServerError> {
    let registry = Arc::new(RoomRegistry::new());
    let directory: Arc<dyn UserDirectory> = Arc::new(InMemoryUserDirectory::new());
    Ok(Arc::new(AppState::new(
        registry,
        directory,
        config.default_room_name()?,
        config.empty_room_ttl(),
    )))
}

/// Bind according to `config` and serve until Ctrl-C / SIGTERM.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let state = build_state(&config)?;
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    serve(listener, state, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves, then close
/// every live connection.
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Listening on {}", addr);
    }

    let registry = Arc::clone(state.registry());
    let sweeper = tokio::spawn(sweep_idle_rooms(
        Arc::clone(&registry),
        state.empty_room_ttl,
    ));
    let app = build_router(state);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            registry.close_all();
        })
        .await;
    sweeper.abort();
    served.map_err(ServerError::Serve)?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Periodically reclaim empty rooms older than `ttl`.
async fn sweep_idle_rooms(registry: Arc<RoomRegistry>, ttl: Duration) {
    let period = (ttl / 2).max(Duration::from_secs(1));
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let reclaimed = registry.reclaim_idle(ttl);
        if reclaimed > 0 {
            tracing::debug!("Idle sweep reclaimed {} rooms", reclaimed);
        }
    }
}
