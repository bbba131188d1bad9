use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::errors::{OrchestratorError, OrchestratorResult};
use super::transport::AgentTransport;

/// Name -> transport mapping shared by all requests
///
/// Reads take a shared lock; registration and removal take the exclusive
/// lock. Re-registering a name replaces the previous transport.
#[derive(Default)]
pub struct AgentRegistry {
    agents: RwLock<HashMap<String, Arc<dyn AgentTransport>>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. Returns true if an existing entry was replaced.
    pub fn register(&self, name: impl Into<String>, transport: Arc<dyn AgentTransport>) -> bool {
        let mut agents = self.agents.write().unwrap_or_else(PoisonError::into_inner);
        agents.insert(name.into(), transport).is_some()
    }

    pub fn lookup(&self, name: &str) -> OrchestratorResult<Arc<dyn AgentTransport>> {
        let agents = self.agents.read().unwrap_or_else(PoisonError::into_inner);
        agents
            .get(name)
            .cloned()
            .ok_or_else(|| OrchestratorError::AgentNotRegistered(name.to_string()))
    }

    pub fn unregister(&self, name: &str) -> Option<Arc<dyn AgentTransport>> {
        let mut agents = self.agents.write().unwrap_or_else(PoisonError::into_inner);
        agents.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        let agents = self.agents.read().unwrap_or_else(PoisonError::into_inner);
        agents.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let agents = self.agents.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = agents.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.agents.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("agents", &self.names())
            .finish()
    }
}
