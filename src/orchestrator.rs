//! Request coordination
//!
//! Ties the intent parser, the agent registry and the transports together:
//! text is parsed into a StructuredRequest, the target agent is looked up,
//! and the worker's response mapping is handed back to the caller.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::agents::{
    AgentMessage, AgentRegistry, AgentTransport, OrchestratorError, OrchestratorResult, Payload,
    RequestLifecycle, RequestPhase,
};
use crate::intent::{IntentParser, StructuredRequest};

/// Upper bound on a single worker call unless configured otherwise
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Advisory view of one registered agent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intents: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct Orchestrator {
    parser: Arc<dyn IntentParser>,
    registry: Arc<AgentRegistry>,
    call_timeout: Duration,
}

impl Orchestrator {
    /// Create an orchestrator over an already constructed registry
    pub fn new(parser: Arc<dyn IntentParser>, registry: Arc<AgentRegistry>) -> Self {
        Self {
            parser,
            registry,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Bound every worker call by `timeout`
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Administrative: add or replace the transport for `name`
    pub fn register_agent(&self, name: &str, transport: Arc<dyn AgentTransport>) {
        if self.registry.register(name, transport) {
            info!("agent re-registered: {}", name);
        } else {
            info!("agent registered: {}", name);
        }
    }

    /// Convert free text into a StructuredRequest
    pub fn parse_input(&self, text: &str) -> OrchestratorResult<StructuredRequest> {
        self.parser.parse(text)
    }

    /// Send the request to its agent and return the worker's response mapping
    #[instrument(skip(self, request, cancel), fields(id = %request.id, agent = %request.agent, action = %request.action))]
    pub async fn route_and_execute(
        &self,
        request: StructuredRequest,
        cancel: &CancellationToken,
    ) -> OrchestratorResult<Payload> {
        let transport = self.registry.lookup(&request.agent)?;
        self.execute(transport, request, cancel).await
    }

    /// Parse then route, tracking the request through its phases
    pub async fn handle_query(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> OrchestratorResult<Payload> {
        let mut lifecycle = RequestLifecycle::new();
        let result = self.run(text, cancel, &mut lifecycle).await;

        if let Err(e) = &result {
            lifecycle.fail();
            warn!(request_id = ?lifecycle.request_id(), code = e.code(), "request failed: {}", e);
        }
        result
    }

    async fn run(
        &self,
        text: &str,
        cancel: &CancellationToken,
        lifecycle: &mut RequestLifecycle,
    ) -> OrchestratorResult<Payload> {
        let request = self.parse_input(text)?;
        lifecycle.set_request_id(request.id);
        lifecycle.advance(RequestPhase::Parsed)?;

        let transport = self.registry.lookup(&request.agent)?;
        lifecycle.advance(RequestPhase::Routed)?;

        let response = self.execute(transport, request, cancel).await?;
        lifecycle.advance(RequestPhase::Executed)?;
        lifecycle.advance(RequestPhase::Completed)?;
        Ok(response)
    }

    async fn execute(
        &self,
        transport: Arc<dyn AgentTransport>,
        request: StructuredRequest,
        cancel: &CancellationToken,
    ) -> OrchestratorResult<Payload> {
        let agent = request.agent.clone();
        let message = AgentMessage::from(request);
        let call = tokio::time::timeout(self.call_timeout, transport.handle(message));

        let reply = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(OrchestratorError::Cancelled(agent)),
            result = call => match result {
                Ok(reply) => reply?,
                Err(_) => {
                    return Err(OrchestratorError::unavailable(
                        &agent,
                        format!("no reply within {} ms", self.call_timeout.as_millis()),
                    ))
                }
            },
        };

        reply.into_payload(&agent)
    }

    /// Ask every registered agent to describe itself.
    /// Unreachable agents are listed with the error instead of their intents.
    pub async fn describe_agents(&self) -> Vec<AgentSummary> {
        let mut summaries = Vec::new();
        for name in self.registry.names() {
            let Ok(transport) = self.registry.lookup(&name) else {
                // Removed between names() and lookup()
                continue;
            };
            let described = tokio::time::timeout(self.call_timeout, transport.describe()).await;
            let summary = match described {
                Ok(Ok(description)) => AgentSummary {
                    name,
                    intents: Some(description.intents),
                    error: None,
                },
                Ok(Err(e)) => AgentSummary {
                    name,
                    intents: None,
                    error: Some(e.to_string()),
                },
                Err(_) => AgentSummary {
                    name,
                    intents: None,
                    error: Some("timed out".to_string()),
                },
            };
            summaries.push(summary);
        }
        summaries
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("parser", &self.parser.name())
            .field("registry", &self.registry)
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{AgentDescription, AgentResponse};
    use crate::intent::KeywordParser;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Echoes the payload back and counts calls
    #[derive(Default)]
    struct EchoTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AgentTransport for EchoTransport {
        async fn handle(&self, message: AgentMessage) -> OrchestratorResult<AgentResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AgentResponse::ok(message.payload))
        }

        async fn describe(&self) -> OrchestratorResult<AgentDescription> {
            Ok(AgentDescription {
                name: "echo".to_string(),
                intents: vec!["create_event".to_string()],
            })
        }
    }

    /// Never answers
    struct StalledTransport;

    #[async_trait]
    impl AgentTransport for StalledTransport {
        async fn handle(&self, _message: AgentMessage) -> OrchestratorResult<AgentResponse> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(AgentResponse::ok(Payload::new()))
        }

        async fn describe(&self) -> OrchestratorResult<AgentDescription> {
            Err(OrchestratorError::unavailable("stalled", "connection refused"))
        }
    }

    /// Replies with a failure status
    struct FailingTransport;

    #[async_trait]
    impl AgentTransport for FailingTransport {
        async fn handle(&self, _message: AgentMessage) -> OrchestratorResult<AgentResponse> {
            Ok(AgentResponse::error("calendar is full"))
        }

        async fn describe(&self) -> OrchestratorResult<AgentDescription> {
            Err(OrchestratorError::transport("failing", "HTTP 500"))
        }
    }

    fn orchestrator() -> Orchestrator {
        Orchestrator::new(
            Arc::new(KeywordParser::default()),
            Arc::new(AgentRegistry::new()),
        )
    }

    fn request(agent: &str) -> StructuredRequest {
        let mut payload = Payload::new();
        payload.insert("title".into(), json!("plan"));
        payload.insert("tags".into(), json!(["a", "b"]));
        payload.insert("priority".into(), json!(2));
        StructuredRequest::new(agent, "create_event", payload)
    }

    #[tokio::test]
    async fn echo_round_trip_returns_original_payload() {
        let orch = orchestrator();
        let echo = Arc::new(EchoTransport::default());
        orch.register_agent("calendar", echo.clone());

        let request = request("calendar");
        let expected = request.payload.clone();

        let response = orch
            .route_and_execute(request, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(response, expected);
        assert_eq!(echo.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unregistered_agent_makes_no_call() {
        let orch = orchestrator();
        let echo = Arc::new(EchoTransport::default());
        orch.register_agent("todo", echo.clone());

        let err = orch
            .route_and_execute(request("calendar"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::AgentNotRegistered(ref a) if a == "calendar"));
        assert_eq!(echo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unmatched_text_never_routes() {
        let orch = orchestrator();
        let echo = Arc::new(EchoTransport::default());
        orch.register_agent("calendar", echo.clone());
        orch.register_agent("todo", echo.clone());

        let err = orch
            .handle_query("hello there", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(echo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn handle_query_parses_and_routes() {
        let orch = orchestrator();
        orch.register_agent("calendar", Arc::new(EchoTransport::default()));

        let response = orch
            .handle_query("schedule a meeting with bob", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(response["title"], "schedule a meeting with bob");
    }

    #[tokio::test]
    async fn failure_status_is_transport_error() {
        let orch = orchestrator();
        orch.register_agent("calendar", Arc::new(FailingTransport));

        let err = orch
            .route_and_execute(request("calendar"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "transport_error");
        assert!(err.to_string().contains("calendar is full"));
    }

    #[tokio::test]
    async fn slow_worker_hits_deadline() {
        let orch = orchestrator().with_call_timeout(Duration::from_millis(50));
        orch.register_agent("calendar", Arc::new(StalledTransport));

        let err = orch
            .route_and_execute(request("calendar"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "transport_unavailable");
    }

    #[tokio::test]
    async fn cancellation_aborts_in_flight_call() {
        let orch = orchestrator();
        orch.register_agent("calendar", Arc::new(StalledTransport));

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = orch
            .route_and_execute(request("calendar"), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::Cancelled(_)));
    }

    #[tokio::test]
    async fn re_registration_replaces_transport() {
        let orch = orchestrator();
        orch.register_agent("calendar", Arc::new(FailingTransport));
        orch.register_agent("calendar", Arc::new(EchoTransport::default()));

        assert_eq!(orch.registry().len(), 1);
        assert!(orch
            .route_and_execute(request("calendar"), &CancellationToken::new())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn describe_agents_reports_failures_per_agent() {
        let orch = orchestrator();
        orch.register_agent("calendar", Arc::new(EchoTransport::default()));
        orch.register_agent("todo", Arc::new(FailingTransport));

        let summaries = orch.describe_agents().await;
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].name, "calendar");
        assert_eq!(summaries[0].intents, Some(vec!["create_event".to_string()]));
        assert_eq!(summaries[1].name, "todo");
        assert!(summaries[1].intents.is_none());
        assert!(summaries[1].error.is_some());
    }
}
