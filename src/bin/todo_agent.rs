use std::sync::Arc;

use intent_orchestrator::config::{worker_addr, DEFAULT_TODO_ADDR};
use intent_orchestrator::workers::{self, TodoWorker};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    intent_orchestrator::init_tracing();

    let addr = worker_addr("TODO_ADDR", DEFAULT_TODO_ADDR);
    workers::serve(Arc::new(TodoWorker::new()), addr)
        .await
        .expect("Todo agent failed");
}
