use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use vereinsbot::errors::ProviderError;
use vereinsbot::retry::ask_with_retry;
use vereinsbot::NO_ANSWER_FALLBACK;

/// Used when the request carries no message at all.
pub const DEFAULT_GREETING: &str = "Hallo!";

/// Shown when the upstream quota is exhausted even after the retry. Static
/// action links so the visitor still gets somewhere.
pub const QUOTA_EXHAUSTED_MESSAGE: &str = "Momentan sind unsere KI-Kontingente erschöpft. \
    Bitte nutze die Links: \
    Mitglied werden: https://www.tsv-griedel.de/mitglied-werden · \
    Spenden: https://www.tsv-griedel.de/spenden · \
    Probetraining: info@tsv-griedel.de";

#[derive(Debug, Serialize)]
struct ChatResponse {
    reply: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Lenient body parsing: accepts a JSON object, a JSON-encoded string that
/// itself contains an object, or anything unparseable, which degrades to an
/// empty object instead of failing the request.
fn parse_body(body: &[u8]) -> Value {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::String(inner)) => serde_json::from_str(&inner).unwrap_or_else(|e| {
            tracing::warn!("body parse error: {}", e);
            json!({})
        }),
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("body parse error: {}", e);
            json!({})
        }
    }
}

fn extract_message(body: &[u8]) -> String {
    parse_body(body)
        .get("message")
        .and_then(|v| v.as_str())
        .filter(|message| !message.is_empty())
        .map(|message| message.to_string())
        .unwrap_or_else(|| DEFAULT_GREETING.to_string())
}

async fn chat_handler(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let message = extract_message(&body);

    let Some(provider) = state.provider else {
        tracing::error!("no upstream API key configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "API key missing on server".to_string(),
            }),
        )
            .into_response();
    };

    match ask_with_retry(provider.as_ref(), &message).await {
        Ok(reply) => {
            let reply = if reply.is_empty() {
                NO_ANSWER_FALLBACK.to_string()
            } else {
                reply
            };
            (StatusCode::OK, Json(ChatResponse { reply })).into_response()
        }
        Err(ProviderError::RateLimited) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: QUOTA_EXHAUSTED_MESSAGE.to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("upstream request failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Bare OPTIONS requests (not only CORS preflights) answer 200 with an empty
/// body; the CORS layer adds its headers on the way out.
async fn options_handler() -> StatusCode {
    StatusCode::OK
}

// Configure routes for this module
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat_handler).options(options_handler))
        .with_state(state)
}
