// Request lifecycle tracking
//
// Each inbound call moves forward through these phases exactly once.
// A failed request is terminal; callers resubmit if they want a retry.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{OrchestratorError, OrchestratorResult};

/// Phase of a single request
///
/// # Transitions
/// ```text
/// Received -> Parsed -> Routed -> Executed -> Completed
///     └---------└---------└----> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestPhase {
    Received,
    Parsed,
    Routed,
    Executed,
    Completed,
    Failed,
}

impl RequestPhase {
    pub fn can_transition_to(&self, next: RequestPhase) -> bool {
        use RequestPhase::*;
        matches!(
            (self, next),
            (Received, Parsed)
                | (Parsed, Routed)
                | (Routed, Executed)
                | (Executed, Completed)
                | (Received, Failed)
                | (Parsed, Failed)
                | (Routed, Failed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestPhase::Completed | RequestPhase::Failed)
    }
}

impl std::fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestPhase::Received => write!(f, "received"),
            RequestPhase::Parsed => write!(f, "parsed"),
            RequestPhase::Routed => write!(f, "routed"),
            RequestPhase::Executed => write!(f, "executed"),
            RequestPhase::Completed => write!(f, "completed"),
            RequestPhase::Failed => write!(f, "failed"),
        }
    }
}

/// Tracks one request through its phases
#[derive(Debug, Clone)]
pub struct RequestLifecycle {
    request_id: Option<Uuid>,
    phase: RequestPhase,
}

impl RequestLifecycle {
    pub fn new() -> Self {
        Self {
            request_id: None,
            phase: RequestPhase::Received,
        }
    }

    pub fn phase(&self) -> RequestPhase {
        self.phase
    }

    pub fn request_id(&self) -> Option<Uuid> {
        self.request_id
    }

    pub fn set_request_id(&mut self, id: Uuid) {
        self.request_id = Some(id);
    }

    pub fn advance(&mut self, next: RequestPhase) -> OrchestratorResult<()> {
        if !self.phase.can_transition_to(next) {
            return Err(OrchestratorError::InvalidStateTransition {
                from: self.phase.to_string(),
                to: next.to_string(),
            });
        }
        tracing::debug!(request_id = ?self.request_id, from = %self.phase, to = %next, "request phase");
        self.phase = next;
        Ok(())
    }

    /// Moves to Failed from any non-terminal phase that allows it
    pub fn fail(&mut self) {
        if self.phase.can_transition_to(RequestPhase::Failed) {
            tracing::debug!(request_id = ?self.request_id, from = %self.phase, "request failed");
            self.phase = RequestPhase::Failed;
        }
    }
}

impl Default for RequestLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
