use scout::invoker::AgentInvoker;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub invoker: Arc<AgentInvoker>,
}

impl AppState {
    pub fn new(invoker: AgentInvoker) -> Self {
        Self {
            invoker: Arc::new(invoker),
        }
    }
}
