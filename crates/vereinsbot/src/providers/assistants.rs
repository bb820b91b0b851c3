use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

use super::base::AssistantProvider;
use super::configs::OpenAiAssistantsConfig;
use crate::errors::{ProviderError, ProviderResult};
use crate::intent::{detect_category, tag_message};
use crate::poll::{poll_until, PollConfig, PollOutcome};
use crate::prompt;
use crate::NO_ANSWER_FALLBACK;

/// Multi-step strategy: a transient assistant, thread and run are created per
/// request and the run status is polled until a terminal state.
///
/// The transient resources are not deleted afterwards; the upstream service
/// expires them on its own.
pub struct AssistantsProvider {
    client: Client,
    config: OpenAiAssistantsConfig,
    poll: PollConfig,
}

impl AssistantsProvider {
    pub fn new(config: OpenAiAssistantsConfig) -> ProviderResult<Self> {
        Self::with_poll_config(config, PollConfig::default())
    }

    pub fn with_poll_config(
        config: OpenAiAssistantsConfig,
        poll: PollConfig,
    ) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            config,
            poll,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.host.trim_end_matches('/'), path)
    }

    async fn post(&self, path: &str, payload: Value) -> ProviderResult<Value> {
        let response = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("OpenAI-Beta", "assistants=v2")
            .json(&payload)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn get(&self, path: &str) -> ProviderResult<Value> {
        let response = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("OpenAI-Beta", "assistants=v2")
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn read_json(response: reqwest::Response) -> ProviderResult<Value> {
        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            StatusCode::TOO_MANY_REQUESTS => Err(ProviderError::RateLimited),
            status => Err(ProviderError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }

    /// One poll attempt against the run status endpoint.
    async fn run_status(&self, thread_id: &str, run_id: &str) -> ProviderResult<PollOutcome<()>> {
        let run = self
            .get(&format!("/v1/threads/{}/runs/{}", thread_id, run_id))
            .await?;
        match field_str(&run, "status")? {
            "completed" => Ok(PollOutcome::Done(())),
            status @ ("failed" | "cancelled" | "expired") => Err(ProviderError::RunTerminated {
                status: status.to_string(),
            }),
            _ => Ok(PollOutcome::Pending),
        }
    }

    /// First textual content segment of the most recent thread message.
    async fn latest_message_text(&self, thread_id: &str) -> ProviderResult<Option<String>> {
        let messages = self
            .get(&format!(
                "/v1/threads/{}/messages?order=desc&limit=1",
                thread_id
            ))
            .await?;

        let text = messages
            .get("data")
            .and_then(|v| v.as_array())
            .and_then(|data| data.first())
            .and_then(|latest| latest.get("content"))
            .and_then(|v| v.as_array())
            .and_then(|segments| {
                segments
                    .iter()
                    .find(|s| s.get("type").and_then(|v| v.as_str()) == Some("text"))
            })
            .and_then(|segment| segment.pointer("/text/value"))
            .and_then(|v| v.as_str())
            .filter(|text| !text.is_empty())
            .map(|text| text.to_string());

        Ok(text)
    }
}

fn field_str<'a>(value: &'a Value, field: &str) -> ProviderResult<&'a str> {
    value
        .get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ProviderError::Api {
            status: 200,
            message: format!("missing `{}` in upstream response", field),
        })
}

#[async_trait]
impl AssistantProvider for AssistantsProvider {
    async fn ask(&self, message: &str) -> ProviderResult<String> {
        let category = detect_category(message);
        let instructions = prompt::assistant_instructions(category)?;

        let assistant = self
            .post(
                "/v1/assistants",
                json!({
                    "model": self.config.model,
                    "instructions": instructions,
                    "tools": [{ "type": "file_search" }],
                    "tool_resources": {
                        "file_search": { "vector_store_ids": [self.config.vector_store_id] }
                    }
                }),
            )
            .await?;
        let assistant_id = field_str(&assistant, "id")?;

        let thread = self
            .post(
                "/v1/threads",
                json!({
                    "messages": [{ "role": "user", "content": tag_message(category, message) }]
                }),
            )
            .await?;
        let thread_id = field_str(&thread, "id")?.to_string();

        let run = self
            .post(
                &format!("/v1/threads/{}/runs", thread_id),
                json!({ "assistant_id": assistant_id }),
            )
            .await?;
        let run_id = field_str(&run, "id")?.to_string();

        let completed = poll_until(self.poll, || self.run_status(&thread_id, &run_id)).await?;
        if completed.is_none() {
            return Err(ProviderError::RunTimeout);
        }

        Ok(self
            .latest_message_text(&thread_id)
            .await?
            .unwrap_or_else(|| NO_ANSWER_FALLBACK.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(host: String) -> OpenAiAssistantsConfig {
        OpenAiAssistantsConfig {
            host,
            api_key: "test_api_key".to_string(),
            model: "gpt-4.1-mini".to_string(),
            vector_store_id: "vs_test".to_string(),
        }
    }

    fn fast_poll() -> PollConfig {
        PollConfig {
            max_attempts: 3,
            interval: Duration::from_millis(1),
        }
    }

    async fn mount_lifecycle(server: &MockServer, run_status: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/assistants"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "asst_1" })))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/threads"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "thread_1" })))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/threads/thread_1/runs"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "id": "run_1", "status": "queued" })),
            )
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/threads/thread_1/runs/run_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": run_status })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_ask_completed_run() {
        let server = MockServer::start().await;
        mount_lifecycle(&server, "completed").await;
        Mock::given(method("GET"))
            .and(path("/v1/threads/thread_1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "content": [{
                        "type": "text",
                        "text": { "value": "Quelle: Handball_Saison_2025_2026.pdf" }
                    }]
                }]
            })))
            .mount(&server)
            .await;

        let provider =
            AssistantsProvider::with_poll_config(test_config(server.uri()), fast_poll()).unwrap();
        let reply = provider
            .ask("Wann ist das nächste Handballspiel?")
            .await
            .unwrap();
        assert_eq!(reply, "Quelle: Handball_Saison_2025_2026.pdf");
    }

    #[tokio::test]
    async fn test_ask_empty_thread_falls_back() {
        let server = MockServer::start().await;
        mount_lifecycle(&server, "completed").await;
        Mock::given(method("GET"))
            .and(path("/v1/threads/thread_1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&server)
            .await;

        let provider =
            AssistantsProvider::with_poll_config(test_config(server.uri()), fast_poll()).unwrap();
        let reply = provider.ask("Hallo!").await.unwrap();
        assert_eq!(reply, NO_ANSWER_FALLBACK);
    }

    #[tokio::test]
    async fn test_ask_terminal_run_state() {
        let server = MockServer::start().await;
        mount_lifecycle(&server, "failed").await;

        let provider =
            AssistantsProvider::with_poll_config(test_config(server.uri()), fast_poll()).unwrap();
        let err = provider.ask("Hallo!").await.unwrap_err();
        match err {
            ProviderError::RunTerminated { status } => assert_eq!(status, "failed"),
            other => panic!("Expected RunTerminated, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ask_poll_ceiling_times_out() {
        let server = MockServer::start().await;
        mount_lifecycle(&server, "in_progress").await;

        let provider =
            AssistantsProvider::with_poll_config(test_config(server.uri()), fast_poll()).unwrap();
        let err = provider.ask("Hallo!").await.unwrap_err();
        assert!(matches!(err, ProviderError::RunTimeout));
    }

    #[tokio::test]
    async fn test_ask_maps_429_to_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/assistants"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let provider =
            AssistantsProvider::with_poll_config(test_config(server.uri()), fast_poll()).unwrap();
        let err = provider.ask("Hallo!").await.unwrap_err();
        assert!(matches!(err, ProviderError::RateLimited));
    }
}
