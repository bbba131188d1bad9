use std::sync::Arc;

use intent_orchestrator::config::{worker_addr, DEFAULT_CALENDAR_ADDR};
use intent_orchestrator::workers::{self, CalendarWorker};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    intent_orchestrator::init_tracing();

    let addr = worker_addr("CALENDAR_ADDR", DEFAULT_CALENDAR_ADDR);
    workers::serve(Arc::new(CalendarWorker::new()), addr)
        .await
        .expect("Calendar agent failed");
}
