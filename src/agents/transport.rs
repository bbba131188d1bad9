use async_trait::async_trait;

use super::errors::OrchestratorResult;
use super::messages::{AgentDescription, AgentMessage, AgentResponse};

/// One request/response exchange with a worker
///
/// Implementations attempt each call exactly once. Deadlines and
/// cancellation are applied by the caller around `handle`.
#[async_trait]
pub trait AgentTransport: Send + Sync {
    /// Deliver a message and return the worker's reply.
    ///
    /// Fails with `TransportUnavailable` when the worker cannot be reached
    /// and `TransportError` when it replies with a failure or a malformed body.
    async fn handle(&self, message: AgentMessage) -> OrchestratorResult<AgentResponse>;

    /// Advisory metadata about what the worker can do. Not used for routing.
    async fn describe(&self) -> OrchestratorResult<AgentDescription>;
}
