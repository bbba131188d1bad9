//! Intent Orchestrator Library
//!
//! Accepts free-text commands, turns each into a structured intent and
//! dispatches it to an independently deployed worker service, returning the
//! worker's answer. Includes the HTTP API, the agent registry and
//! transports, and reference calendar/todo workers.

pub mod agents;
pub mod api;
pub mod config;
pub mod intent;
pub mod orchestrator;
pub mod workers;

pub use orchestrator::Orchestrator;

/// Install the fmt subscriber, honouring `RUST_LOG` (default `info`)
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
