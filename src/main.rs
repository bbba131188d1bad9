use std::sync::Arc;

use intent_orchestrator::agents::{AgentRegistry, HttpAgentTransport};
use intent_orchestrator::api::{self, AppState};
use intent_orchestrator::config::Config;
use intent_orchestrator::Orchestrator;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    intent_orchestrator::init_tracing();

    let config = Config::from_env();
    tracing::info!("Starting orchestrator (intent parser: {})", config.parser);

    // Registry is filled before any request is served
    let registry = Arc::new(AgentRegistry::new());
    let orchestrator = Orchestrator::new(Arc::from(config.parser.build()), registry)
        .with_call_timeout(config.agent_timeout);

    for (name, url) in [("calendar", &config.calendar_url), ("todo", &config.todo_url)] {
        let transport = HttpAgentTransport::new(name, url.as_str())
            .expect("Failed to build HTTP client");
        tracing::info!("{} agent at {}", name, transport.base_url());
        orchestrator.register_agent(name, Arc::new(transport));
    }

    let app = api::router(AppState::new(Arc::new(orchestrator)));

    // Start server
    tracing::info!("Server listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .await
        .expect("Server failed");
}
