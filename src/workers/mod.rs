// Reference worker services
//
// Each worker is an independent HTTP service exposing /v1/meta and
// /v1/handle. The same Worker can also be registered in-process through
// LocalTransport.

pub mod calendar;
pub mod todo;

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::agents::messages::{AgentDescription, AgentMessage, AgentResponse, Payload};

pub use calendar::CalendarWorker;
pub use todo::TodoWorker;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("unknown action")]
    UnknownAction(String),

    #[error("payload field {0:?} is required and must be a string")]
    MissingField(&'static str),
}

pub type WorkerResult<T> = Result<T, WorkerError>;

/// A domain service the orchestrator can route to
#[async_trait]
pub trait Worker: Send + Sync {
    fn name(&self) -> &str;

    /// Actions this worker understands
    fn intents(&self) -> Vec<String>;

    async fn handle(&self, action: &str, payload: &Payload) -> WorkerResult<Payload>;

    fn describe(&self) -> AgentDescription {
        AgentDescription {
            name: self.name().to_string(),
            intents: self.intents(),
        }
    }
}

/// Reads a required string field from a payload
pub fn required_str<'a>(payload: &'a Payload, key: &'static str) -> WorkerResult<&'a str> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .ok_or(WorkerError::MissingField(key))
}

pub type SharedWorker = Arc<dyn Worker>;

/// Builds the HTTP surface of a worker
pub fn router(worker: SharedWorker) -> Router {
    Router::new()
        .route("/v1/meta", get(meta))
        .route("/v1/handle", post(handle))
        .layer(TraceLayer::new_for_http())
        .with_state(worker)
}

/// Serve a worker until the process exits
pub async fn serve(worker: SharedWorker, addr: SocketAddr) -> std::io::Result<()> {
    let name = worker.name().to_string();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("{} agent listening on {}", name, listener.local_addr()?);
    axum::serve(listener, router(worker)).await
}

async fn meta(State(worker): State<SharedWorker>) -> Json<AgentDescription> {
    Json(worker.describe())
}

async fn handle(State(worker): State<SharedWorker>, Json(message): Json<AgentMessage>) -> Response {
    tracing::info!(id = %message.id, action = %message.action, "handling message");

    match worker.handle(&message.action, &message.payload).await {
        Ok(response) => Json(AgentResponse::ok(response)).into_response(),
        Err(WorkerError::UnknownAction(action)) => {
            tracing::warn!(action = %action, "unknown action");
            (StatusCode::BAD_REQUEST, "unknown action").into_response()
        }
        Err(e) => {
            tracing::warn!(id = %message.id, "rejected message: {}", e);
            Json(AgentResponse::error(e.to_string())).into_response()
        }
    }
}
