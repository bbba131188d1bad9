use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::errors::{OrchestratorError, OrchestratorResult};
use super::messages::{AgentDescription, AgentMessage, AgentResponse};
use super::transport::AgentTransport;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Talks to a worker service over HTTP
///
/// - `POST {base_url}/v1/handle` with an AgentMessage
/// - `GET {base_url}/v1/meta` for the capability description
#[derive(Debug, Clone)]
pub struct HttpAgentTransport {
    name: String,
    base_url: String,
    client: Client,
}

impl HttpAgentTransport {
    /// Creates a transport for the worker `name` reachable at `base_url`
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> OrchestratorResult<Self> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| OrchestratorError::ConfigError(format!("HTTP client: {}", e)))?;
        Ok(Self::with_client(name, base_url, client))
    }

    /// Reuses an existing client (shared connection pool, custom timeouts)
    pub fn with_client(name: impl Into<String>, base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            name: name.into(),
            base_url,
            client,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn send_error(&self, e: reqwest::Error) -> OrchestratorError {
        if e.is_connect() {
            OrchestratorError::unavailable(
                &self.name,
                format!("failed to connect to {}", self.base_url),
            )
        } else if e.is_timeout() {
            OrchestratorError::unavailable(&self.name, "timed out")
        } else {
            OrchestratorError::unavailable(&self.name, e.to_string())
        }
    }

    async fn read_reply<T: DeserializeOwned>(&self, response: reqwest::Response) -> OrchestratorResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OrchestratorError::transport(&self.name, e.to_string()))?;

        if !status.is_success() {
            let detail = body.trim();
            let reason = if detail.is_empty() {
                format!("HTTP {}", status)
            } else {
                format!("HTTP {}: {}", status, detail)
            };
            return Err(OrchestratorError::transport(&self.name, reason));
        }

        serde_json::from_str(&body).map_err(|e| {
            OrchestratorError::transport(&self.name, format!("malformed reply: {}", e))
        })
    }
}

#[async_trait]
impl AgentTransport for HttpAgentTransport {
    async fn handle(&self, message: AgentMessage) -> OrchestratorResult<AgentResponse> {
        let url = format!("{}/v1/handle", self.base_url);
        debug!(agent = %self.name, id = %message.id, action = %message.action, "Sending message to {}", url);

        let response = self
            .client
            .post(&url)
            .json(&message)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        let reply: AgentResponse = self.read_reply(response).await?;
        reply.ensure_ok(&self.name)
    }

    async fn describe(&self) -> OrchestratorResult<AgentDescription> {
        let url = format!("{}/v1/meta", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        self.read_reply(response).await
    }
}
