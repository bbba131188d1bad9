use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::agents::Payload;
use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::orchestrator::AgentSummary;

/// Request body for a text command
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub input: String,
}

/// Run a text command through the orchestrator
///
/// POST /v1/query
pub async fn query(
    State(state): State<AppState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<Payload>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::invalid_request(format!("invalid JSON: {}", e)))?;

    // Fires when this future is dropped, e.g. the client went away mid-call.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let response = state.orchestrator.handle_query(&req.input, &cancel).await?;
    Ok(Json(response))
}

/// List registered agents with their advertised intents
///
/// GET /v1/agents
pub async fn list_agents(State(state): State<AppState>) -> Json<Vec<AgentSummary>> {
    Json(state.orchestrator.describe_agents().await)
}
