use serde_json::Value;

use super::{IntentParser, StructuredRequest};
use crate::agents::errors::{OrchestratorError, OrchestratorResult};
use crate::agents::messages::Payload;

const CALENDAR_KEYWORDS: &[&str] = &["meeting", "schedule", "calendar"];
const TODO_KEYWORDS: &[&str] = &["task", "todo", "remind"];

/// One vocabulary: if any keyword occurs in the text, the text maps to
/// `agent`/`action` and is carried verbatim under `payload_key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentRule {
    agent: String,
    action: String,
    payload_key: String,
    keywords: Vec<String>,
}

impl IntentRule {
    pub fn new<I, S>(
        agent: impl Into<String>,
        action: impl Into<String>,
        payload_key: impl Into<String>,
        keywords: I,
    ) -> OrchestratorResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let agent = agent.into();
        let action = action.into();
        let payload_key = payload_key.into();
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        if agent.trim().is_empty() || action.trim().is_empty() {
            return Err(OrchestratorError::ConfigError(
                "intent rule needs a non-empty agent and action".to_string(),
            ));
        }
        if payload_key.trim().is_empty() {
            return Err(OrchestratorError::ConfigError(format!(
                "intent rule {}/{} needs a payload key",
                agent, action
            )));
        }
        if keywords.is_empty() {
            return Err(OrchestratorError::ConfigError(format!(
                "intent rule {}/{} has no keywords",
                agent, action
            )));
        }

        Ok(Self {
            agent,
            action,
            payload_key,
            keywords,
        })
    }

    pub fn agent(&self) -> &str {
        &self.agent
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// `lowered` must already be lowercase
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }

    fn build(&self, text: &str) -> StructuredRequest {
        let mut payload = Payload::new();
        payload.insert(self.payload_key.clone(), Value::String(text.to_string()));
        StructuredRequest::new(self.agent.clone(), self.action.clone(), payload)
    }
}

/// Case-insensitive substring matching against per-agent vocabularies.
///
/// Rules are tried in the order they were added and the first match wins,
/// so text containing words from several vocabularies resolves to the
/// earliest rule.
#[derive(Debug, Clone)]
pub struct KeywordParser {
    rules: Vec<IntentRule>,
}

impl KeywordParser {
    pub fn new(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }
}

impl Default for KeywordParser {
    fn default() -> Self {
        let rules = vec![
            IntentRule {
                agent: "calendar".to_string(),
                action: "create_event".to_string(),
                payload_key: "title".to_string(),
                keywords: CALENDAR_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            },
            IntentRule {
                agent: "todo".to_string(),
                action: "add_task".to_string(),
                payload_key: "task".to_string(),
                keywords: TODO_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            },
        ];
        Self::new(rules)
    }
}

impl IntentParser for KeywordParser {
    fn name(&self) -> &str {
        "keyword"
    }

    fn parse(&self, text: &str) -> OrchestratorResult<StructuredRequest> {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.build(text))
            .ok_or_else(|| OrchestratorError::NoIntentMatched(text.to_string()))
    }
}
