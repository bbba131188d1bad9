// API layer module (HTTP adapter in front of the orchestrator)

pub mod errors;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::orchestrator::Orchestrator;
use handlers::{health, query};

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }
}

/// Build the orchestrator's HTTP router
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Text commands
        .route("/v1/query", post(query::query))
        // Advisory agent metadata
        .route("/v1/agents", get(query::list_agents))
        // Middleware
        .layer(TraceLayer::new_for_http())
        // Shared state
        .with_state(state)
}
