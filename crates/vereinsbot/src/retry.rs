//! Rate-limit retry policy: one invocation, plus exactly one more when the
//! upstream signals 429. Every other failure propagates untouched.

use crate::errors::{ProviderError, ProviderResult};
use crate::providers::base::AssistantProvider;

pub async fn ask_with_retry(
    provider: &dyn AssistantProvider,
    message: &str,
) -> ProviderResult<String> {
    match provider.ask(message).await {
        Err(ProviderError::RateLimited) => {
            tracing::warn!("upstream rate limited, retrying once");
            provider.ask(message).await
        }
        other => other,
    }
}
