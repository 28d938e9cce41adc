//! Image Generator A2A Server
//!
//! Serves the image agent over the A2A protocol: an agent card for
//! discovery and a JSON-RPC endpoint with plain and SSE message methods.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub mod handlers;
pub mod models;
pub mod state;

pub use models::AgentCard;
pub use state::{AppState, InMemoryTaskStore};

/// Build the router with all endpoints
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handlers::jsonrpc))
        .route("/health", get(handlers::health))
        .route("/.well-known/agent.json", get(handlers::agent_card))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
