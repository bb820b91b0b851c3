use std::sync::Arc;
use vereinsbot::providers::base::AssistantProvider;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// `None` when no upstream credential is configured; the chat route then
    /// answers 500 without attempting an upstream call.
    pub provider: Option<Arc<dyn AssistantProvider>>,
}

impl AppState {
    pub fn new(provider: Option<Arc<dyn AssistantProvider>>) -> Self {
        Self { provider }
    }
}
