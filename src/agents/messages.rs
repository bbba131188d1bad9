// Wire model shared by the orchestrator and the workers
//
// Workers expose POST /v1/handle (AgentMessage -> AgentResponse)
// and GET /v1/meta (AgentDescription).

use serde::{Deserialize, Serialize};

use super::errors::{OrchestratorError, OrchestratorResult};
use crate::intent::StructuredRequest;

/// Open, schema-less key/value structure carried in requests and replies
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Request sent to a worker. The agent name is consumed by routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMessage {
    pub id: String,
    pub action: String,
    #[serde(default)]
    pub payload: Payload,
}

impl From<StructuredRequest> for AgentMessage {
    fn from(request: StructuredRequest) -> Self {
        Self {
            id: request.id.to_string(),
            action: request.action,
            payload: request.payload,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// Reply from a worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Payload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentResponse {
    pub fn ok(response: Payload) -> Self {
        Self {
            status: ResponseStatus::Ok,
            response: Some(response),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            response: None,
            error: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ResponseStatus::Ok
    }

    /// Fails with `TransportError` when the worker reported a failure
    pub fn ensure_ok(self, agent: &str) -> OrchestratorResult<Self> {
        if self.is_ok() {
            return Ok(self);
        }
        let reason = self
            .error
            .unwrap_or_else(|| "worker reported status error".to_string());
        Err(OrchestratorError::transport(agent, reason))
    }

    /// Consume the status flag and keep only the response mapping.
    /// A successful reply without a mapping yields an empty one.
    pub fn into_payload(self, agent: &str) -> OrchestratorResult<Payload> {
        let response = self.ensure_ok(agent)?;
        Ok(response.response.unwrap_or_default())
    }
}

/// Advisory capability description a worker reports about itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescription {
    pub name: String,
    #[serde(default)]
    pub intents: Vec<String>,
}

impl AgentDescription {
    pub fn supports(&self, action: &str) -> bool {
        self.intents.iter().any(|intent| intent == action)
    }
}
