// Agent plumbing
//
// Wire model, transports to worker services and the registry that maps
// agent names to transports.

pub mod errors;
pub mod http_transport;
pub mod local_transport;
pub mod messages;
pub mod registry;
pub mod state;
pub mod transport;

// Re-export main types
pub use errors::{OrchestratorError, OrchestratorResult};
pub use http_transport::HttpAgentTransport;
pub use local_transport::LocalTransport;
pub use messages::{AgentDescription, AgentMessage, AgentResponse, Payload, ResponseStatus};
pub use registry::AgentRegistry;
pub use state::{RequestLifecycle, RequestPhase};
pub use transport::AgentTransport;
