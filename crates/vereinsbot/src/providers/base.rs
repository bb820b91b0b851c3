use async_trait::async_trait;

use crate::errors::ProviderResult;

/// Base trait for upstream assistant protocols (single-call responses,
/// multi-step assistant runs).
#[async_trait]
pub trait AssistantProvider: Send + Sync {
    /// Submit one visitor message and return the generated reply.
    ///
    /// Protocol implementations substitute [`crate::NO_ANSWER_FALLBACK`]
    /// when the upstream service yields no usable text.
    async fn ask(&self, message: &str) -> ProviderResult<String>;
}
