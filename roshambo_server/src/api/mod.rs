//! HTTP/WebSocket API for the roshambo server.
//!
//! # Modules
//!
//! - [`websocket`]: one connection per room member, carrying the game protocol
//! - [`rooms`]: read-only room listing and snapshots
//! - [`session`]: per-connection session state
//! - [`request_id`]: per-request and per-session correlation ids
//!
//! # Endpoints Overview
//!
//! ```text
//! GET /ws/{room_id}?username=<name>   - Join a room over WebSocket
//! GET /api/rooms                      - List active rooms
//! GET /api/rooms/{room_id}            - Room snapshot
//! GET /api/room/{room_id}             - Room snapshot (singular alias)
//! GET /ping                           - Liveness check
//! GET /health                         - Server health status
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use roshambo::RoomRegistry;
//! use roshambo_server::api::{AppState, create_router};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let state = AppState::new(RoomRegistry::default());
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively. In production, configure appropriate
//! origins, methods, and headers.

pub mod request_id;
pub mod rooms;
pub mod session;
pub mod websocket;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
};
use roshambo::RoomRegistry;
use serde_json::json;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers and WebSocket connections.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RoomRegistry>,
    connections: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(registry: RoomRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            connections: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record a new connection and return the active count
    pub fn connection_opened(&self) -> u64 {
        self.connections.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Record a closed connection and return the active count
    pub fn connection_closed(&self) -> u64 {
        self.connections.fetch_sub(1, Ordering::Relaxed).saturating_sub(1)
    }

    pub fn active_connections(&self) -> u64 {
        self.connections.load(Ordering::Relaxed)
    }
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Arguments
///
/// - `state`: Application state with the room registry
///
/// # Returns
///
/// Configured Axum router ready to serve requests
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/rooms", get(rooms::list_rooms))
        .route("/rooms/{room_id}", get(rooms::get_room))
        .route("/room/{room_id}", get(rooms::get_room));

    Router::new()
        .route("/ping", get(ping))
        .route("/health", get(health_check))
        .route("/ws/{room_id}", get(websocket::websocket_handler))
        .nest("/api", api_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "message": "pong" }))
}

/// Health check endpoint for monitoring and load balancers.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8000/health
/// # {"status":"healthy","version":"0.1.0","rooms":2,"timestamp":"2026-01-01T10:30:00+00:00"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let response = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "rooms": state.registry.room_count().await,
        "connections": state.active_connections(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(response))
}
