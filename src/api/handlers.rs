//! HTTP handlers
//!
//! Chat and suggest endpoints always answer 200. Request bodies are read as
//! raw bytes and parsed leniently: a missing field, a non-string field or a
//! body that is not JSON at all is treated as empty input.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use super::envelope::{ApiErrorResponse, ApiResponse};
use crate::knowledge_base::KnowledgeBaseStats;
use crate::service::AssistService;
use crate::types::Answer;

/// Shared state for all handlers.
pub type AppState = Arc<AssistService>;

/// First string-valued field among `names`, or "".
pub(crate) fn text_field(body: &[u8], names: &[&str]) -> String {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return String::new();
    };
    names
        .iter()
        .find_map(|name| value.get(name).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

// ============================================================================
// Chat
// ============================================================================

/// `POST /chat` - `{message}` or `{question}` -> `{answer, source}`
pub async fn chat(State(service): State<AppState>, body: Bytes) -> Json<Answer> {
    let message = text_field(&body, &["message", "question"]);
    Json(service.chat(&message).await)
}

/// `POST /chatgpt` - `{question}` or `{message}` -> `{answer, source}`
pub async fn chatgpt(State(service): State<AppState>, body: Bytes) -> Json<Answer> {
    let question = text_field(&body, &["question", "message"]);
    Json(service.chatgpt(&question).await)
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<String>,
}

/// `POST /suggest` - `{prefix}` -> `{suggestions}` (at most 5)
pub async fn suggest(State(service): State<AppState>, body: Bytes) -> Json<SuggestResponse> {
    let prefix = text_field(&body, &["prefix"]);
    Json(SuggestResponse {
        suggestions: service.suggest(&prefix),
    })
}

// ============================================================================
// Admin
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub knowledge_base: KnowledgeBaseStats,
    pub source: String,
    pub generative_enabled: bool,
}

/// `GET /health`
pub async fn health(State(service): State<AppState>) -> Response {
    ApiResponse::ok(HealthResponse {
        status: "ok",
        knowledge_base: service.stats(),
        source: service.store().source_name(),
        generative_enabled: service.generative_enabled(),
    })
}

/// `GET /api/v1/kb`
pub async fn kb_stats(State(service): State<AppState>) -> Response {
    ApiResponse::ok(service.stats())
}

/// `POST /api/v1/kb/reload`
pub async fn kb_reload(State(service): State<AppState>) -> Response {
    match service.reload() {
        Ok(stats) => {
            info!(entries = stats.entries, "Knowledge base reloaded via API");
            ApiResponse::ok(stats)
        }
        Err(e) => {
            error!(error = %e, "Knowledge base reload via API failed");
            ApiErrorResponse::internal(e.to_string())
        }
    }
}

/// Unknown `/api/*` paths get a JSON 404 instead of the UI.
pub async fn api_not_found() -> impl IntoResponse {
    ApiErrorResponse::not_found("No such API endpoint")
}
