use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::{required_str, Worker, WorkerError, WorkerResult};
use crate::agents::messages::Payload;

/// A scheduled event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    /// RFC 3339
    pub time: String,
}

/// In-memory calendar. New events are placed 24 hours from now.
#[derive(Debug, Default)]
pub struct CalendarWorker {
    events: Mutex<Vec<Event>>,
}

impl CalendarWorker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn create_event(&self, payload: &Payload) -> WorkerResult<Payload> {
        let title = required_str(payload, "title")?;
        let event = Event {
            id: Uuid::new_v4(),
            title: title.to_string(),
            time: rfc3339_from_now(Duration::hours(24)),
        };
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(event.clone());

        Ok(single("event", json!(event)))
    }

    fn list_availability(&self) -> Payload {
        single("avail", json!([rfc3339_from_now(Duration::hours(48))]))
    }

    fn list_events(&self) -> Payload {
        single("events", json!(self.events()))
    }
}

#[async_trait]
impl Worker for CalendarWorker {
    fn name(&self) -> &str {
        "calendar"
    }

    fn intents(&self) -> Vec<String> {
        vec![
            "create_event".to_string(),
            "list_availability".to_string(),
            "list_events".to_string(),
        ]
    }

    async fn handle(&self, action: &str, payload: &Payload) -> WorkerResult<Payload> {
        match action {
            "create_event" => self.create_event(payload),
            "list_availability" => Ok(self.list_availability()),
            "list_events" => Ok(self.list_events()),
            other => Err(WorkerError::UnknownAction(other.to_string())),
        }
    }
}

fn rfc3339_from_now(offset: Duration) -> String {
    (Utc::now() + offset).to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn single(key: &str, value: serde_json::Value) -> Payload {
    let mut payload = Payload::new();
    payload.insert(key.to_string(), value);
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn payload(title: &str) -> Payload {
        single("title", json!(title))
    }

    #[tokio::test]
    async fn create_event_is_in_the_future() {
        let worker = CalendarWorker::new();
        let response = worker
            .handle("create_event", &payload("schedule a meeting with bob"))
            .await
            .unwrap();

        let event = &response["event"];
        assert_eq!(event["title"], "schedule a meeting with bob");
        assert!(Uuid::parse_str(event["id"].as_str().unwrap()).is_ok());

        let time = DateTime::parse_from_rfc3339(event["time"].as_str().unwrap()).unwrap();
        assert!(time > Utc::now());
        assert_eq!(worker.events().len(), 1);
    }

    #[tokio::test]
    async fn create_event_requires_title() {
        let worker = CalendarWorker::new();
        let err = worker.handle("create_event", &Payload::new()).await.unwrap_err();
        assert!(matches!(err, WorkerError::MissingField("title")));
        assert!(worker.events().is_empty());
    }

    #[tokio::test]
    async fn availability_lists_one_slot() {
        let worker = CalendarWorker::new();
        let response = worker.handle("list_availability", &Payload::new()).await.unwrap();
        assert_eq!(response["avail"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_events_returns_created_events() {
        let worker = CalendarWorker::new();
        worker.handle("create_event", &payload("one")).await.unwrap();
        worker.handle("create_event", &payload("two")).await.unwrap();

        let response = worker.handle("list_events", &Payload::new()).await.unwrap();
        let titles: Vec<_> = response["events"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(titles, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn unknown_action() {
        let worker = CalendarWorker::new();
        let err = worker.handle("add_task", &Payload::new()).await.unwrap_err();
        assert!(matches!(err, WorkerError::UnknownAction(ref a) if a == "add_task"));
    }
}
