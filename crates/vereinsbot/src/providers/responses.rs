use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

use super::base::AssistantProvider;
use super::configs::OpenAiResponsesConfig;
use crate::errors::{ProviderError, ProviderResult};
use crate::intent::{detect_category, tag_message};
use crate::prompt;
use crate::NO_ANSWER_FALLBACK;

/// Single-call strategy: one synchronous request against the responses API,
/// with the file-search tool bound to the club's vector store.
pub struct ResponsesProvider {
    client: Client,
    config: OpenAiResponsesConfig,
}

impl ResponsesProvider {
    pub fn new(config: OpenAiResponsesConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self { client, config })
    }

    async fn post(&self, payload: Value) -> ProviderResult<Value> {
        let url = format!("{}/v1/responses", self.config.host.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&payload)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            StatusCode::TOO_MANY_REQUESTS => Err(ProviderError::RateLimited),
            status => Err(ProviderError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

/// Pull the generated text out of a responses-API result: either the
/// `output_text` convenience field or the first `output_text` segment of the
/// first message output item.
fn extract_output_text(response: &Value) -> Option<String> {
    if let Some(text) = response.get("output_text").and_then(|v| v.as_str()) {
        if !text.is_empty() {
            return Some(text.to_string());
        }
    }

    let output = response.get("output")?.as_array()?;
    for item in output {
        if item.get("type").and_then(|v| v.as_str()) != Some("message") {
            continue;
        }
        let Some(segments) = item.get("content").and_then(|v| v.as_array()) else {
            continue;
        };
        for segment in segments {
            if segment.get("type").and_then(|v| v.as_str()) != Some("output_text") {
                continue;
            }
            if let Some(text) = segment.get("text").and_then(|v| v.as_str()) {
                if !text.is_empty() {
                    return Some(text.to_string());
                }
            }
        }
    }
    None
}

#[async_trait]
impl AssistantProvider for ResponsesProvider {
    async fn ask(&self, message: &str) -> ProviderResult<String> {
        let category = detect_category(message);
        let instructions = prompt::assistant_instructions(category)?;

        let payload = json!({
            "model": self.config.model,
            "instructions": instructions,
            "input": tag_message(category, message),
            "tools": [{
                "type": "file_search",
                "vector_store_ids": [self.config.vector_store_id]
            }]
        });

        let response = self.post(payload).await?;

        if let Some(error) = response.get("error") {
            if !error.is_null() {
                return Err(ProviderError::Api {
                    status: 200,
                    message: error.to_string(),
                });
            }
        }

        Ok(extract_output_text(&response).unwrap_or_else(|| NO_ANSWER_FALLBACK.to_string()))
    }
}
