// Intent recognition
//
// Turns free text into a StructuredRequest. Recognition strategies are
// interchangeable behind the IntentParser trait.

pub mod keyword;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agents::errors::{OrchestratorError, OrchestratorResult};
use crate::agents::messages::Payload;

pub use keyword::{IntentRule, KeywordParser};

/// Structured form of a text command: which agent, which action, what data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredRequest {
    pub id: Uuid,
    pub agent: String,
    pub action: String,
    pub payload: Payload,
}

impl StructuredRequest {
    /// Creates a request with a freshly generated id
    pub fn new(agent: impl Into<String>, action: impl Into<String>, payload: Payload) -> Self {
        Self {
            id: Uuid::new_v4(),
            agent: agent.into(),
            action: action.into(),
            payload,
        }
    }
}

/// Converts raw text into a StructuredRequest
///
/// Implementations must assign a new id on every successful call and
/// fail with `NoIntentMatched` when nothing applies.
pub trait IntentParser: Send + Sync {
    /// Short identifier of the recognition strategy
    fn name(&self) -> &str;

    fn parse(&self, text: &str) -> OrchestratorResult<StructuredRequest>;
}

/// Selects which IntentParser implementation to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserKind {
    #[default]
    Keyword,
}

impl ParserKind {
    pub fn build(self) -> Box<dyn IntentParser> {
        match self {
            ParserKind::Keyword => Box::new(KeywordParser::default()),
        }
    }
}

impl std::str::FromStr for ParserKind {
    type Err = OrchestratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyword" => Ok(ParserKind::Keyword),
            other => Err(OrchestratorError::ConfigError(format!(
                "unknown intent parser: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ParserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParserKind::Keyword => write!(f, "keyword"),
        }
    }
}
