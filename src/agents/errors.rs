use thiserror::Error;

/// Errors that can occur while turning text into a worker call
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("could not parse intent from input: {0:?}")]
    NoIntentMatched(String),

    #[error("agent {0} not registered")]
    AgentNotRegistered(String),

    #[error("agent {agent} unavailable: {reason}")]
    TransportUnavailable { agent: String, reason: String },

    #[error("agent {agent} failed: {reason}")]
    TransportError { agent: String, reason: String },

    #[error("request cancelled before agent {0} replied")]
    Cancelled(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl OrchestratorError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            OrchestratorError::NoIntentMatched(_) => "no_intent_matched",
            OrchestratorError::AgentNotRegistered(_) => "agent_not_registered",
            OrchestratorError::TransportUnavailable { .. } => "transport_unavailable",
            OrchestratorError::TransportError { .. } => "transport_error",
            OrchestratorError::Cancelled(_) => "cancelled",
            OrchestratorError::InvalidStateTransition { .. } => "invalid_state_transition",
            OrchestratorError::ConfigError(_) => "config_error",
        }
    }

    /// True when the caller sent something we cannot act on.
    /// Everything else is a server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, OrchestratorError::NoIntentMatched(_))
    }

    pub(crate) fn unavailable(agent: &str, reason: impl Into<String>) -> Self {
        OrchestratorError::TransportUnavailable {
            agent: agent.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn transport(agent: &str, reason: impl Into<String>) -> Self {
        OrchestratorError::TransportError {
            agent: agent.to_string(),
            reason: reason.into(),
        }
    }
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
