use std::sync::Arc;

use async_trait::async_trait;

use super::errors::{OrchestratorError, OrchestratorResult};
use super::messages::{AgentDescription, AgentMessage, AgentResponse};
use super::transport::AgentTransport;
use crate::workers::{Worker, WorkerError};

/// Calls a worker living in the same process, skipping the network hop
pub struct LocalTransport {
    worker: Arc<dyn Worker>,
}

impl LocalTransport {
    pub fn new(worker: Arc<dyn Worker>) -> Self {
        Self { worker }
    }
}

#[async_trait]
impl AgentTransport for LocalTransport {
    async fn handle(&self, message: AgentMessage) -> OrchestratorResult<AgentResponse> {
        match self.worker.handle(&message.action, &message.payload).await {
            Ok(response) => Ok(AgentResponse::ok(response)),
            Err(e @ WorkerError::UnknownAction(_)) => {
                Err(OrchestratorError::transport(self.worker.name(), e.to_string()))
            }
            Err(e) => AgentResponse::error(e.to_string()).ensure_ok(self.worker.name()),
        }
    }

    async fn describe(&self) -> OrchestratorResult<AgentDescription> {
        Ok(self.worker.describe())
    }
}
