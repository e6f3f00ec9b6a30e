//! Server runner: router construction, bind and serve.

use std::{net::SocketAddr, sync::Arc};

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{
    infrastructure::repository::InMemoryHistoryStore,
    registry::SessionRegistry,
    ui::{
        handler::{health_check, websocket_handler},
        signal::shutdown_signal,
        state::AppState,
    },
};

/// Startup configuration consumed by the runner.
///
/// Opaque to the routing logic; the core never looks at these values.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// Path of the WebSocket endpoint
    pub ws_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8025,
            ws_path: "/ws/websocket".to_string(),
        }
    }
}

/// Run the relay with a fresh registry and in-memory history store.
pub async fn run(config: ServerConfig) -> Result<(), std::io::Error> {
    let state = Arc::new(AppState::new(
        Arc::new(SessionRegistry::new()),
        Arc::new(InMemoryHistoryStore::new()),
    ));
    run_with_state(config, state).await
}

/// Run the relay over pre-built shared state.
pub async fn run_with_state(config: ServerConfig, state: Arc<AppState>) -> Result<(), std::io::Error> {
    let app = Router::new()
        .route(&config.ws_path, get(websocket_handler))
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {} (ws path: {})", addr, config.ws_path);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}
