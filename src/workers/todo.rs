use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::{required_str, Worker, WorkerError, WorkerResult};
use crate::agents::messages::Payload;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub task: String,
}

/// In-memory task list
#[derive(Debug, Default)]
pub struct TodoWorker {
    tasks: Mutex<Vec<Task>>,
}

impl TodoWorker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl Worker for TodoWorker {
    fn name(&self) -> &str {
        "todo"
    }

    fn intents(&self) -> Vec<String> {
        vec!["add_task".to_string(), "list_tasks".to_string()]
    }

    async fn handle(&self, action: &str, payload: &Payload) -> WorkerResult<Payload> {
        let mut response = Payload::new();
        match action {
            "add_task" => {
                let task = Task {
                    id: Uuid::new_v4(),
                    task: required_str(payload, "task")?.to_string(),
                };
                self.tasks
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(task.clone());
                response.insert("task".to_string(), json!(task));
            }
            "list_tasks" => {
                response.insert("tasks".to_string(), json!(self.tasks()));
            }
            other => return Err(WorkerError::UnknownAction(other.to_string())),
        }
        Ok(response)
    }
}
