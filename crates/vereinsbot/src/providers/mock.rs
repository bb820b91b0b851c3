use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::{ProviderError, ProviderResult};
use crate::providers::base::AssistantProvider;

/// A mock provider that returns pre-configured results for testing.
///
/// Results are handed out in order; the call counter lets tests assert how
/// often the upstream would have been hit (retry behavior, missing-credential
/// short circuit).
pub struct MockProvider {
    results: Arc<Mutex<Vec<ProviderResult<String>>>>,
    calls: Arc<AtomicUsize>,
    received: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of results
    pub fn new(results: Vec<ProviderResult<String>>) -> Self {
        Self {
            results: Arc::new(Mutex::new(results)),
            calls: Arc::new(AtomicUsize::new(0)),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn rate_limited() -> Self {
        Self::new(vec![
            Err(ProviderError::RateLimited),
            Err(ProviderError::RateLimited),
        ])
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Messages the provider has been asked so far, oldest first.
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssistantProvider for MockProvider {
    async fn ask(&self, message: &str) -> ProviderResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().unwrap().push(message.to_string());
        let mut results = self.results.lock().unwrap();
        if results.is_empty() {
            // Return empty response if no more pre-configured results
            Ok(String::new())
        } else {
            results.remove(0)
        }
    }
}
