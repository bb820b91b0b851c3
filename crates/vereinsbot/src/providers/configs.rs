/// Unified enum selecting the upstream protocol strategy.
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    /// Single synchronous call against the responses API. Preferred.
    Responses(OpenAiResponsesConfig),
    /// Multi-step assistant/thread/run protocol with status polling.
    Assistants(OpenAiAssistantsConfig),
}

#[derive(Debug, Clone)]
pub struct OpenAiResponsesConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub vector_store_id: String,
}

#[derive(Debug, Clone)]
pub struct OpenAiAssistantsConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub vector_store_id: String,
}
