//! API route definitions
//!
//! - POST /chat, /chatgpt, /suggest - chat UI endpoints (always 200)
//! - GET /health - liveness and knowledge base summary
//! - GET /api/v1/kb, POST /api/v1/kb/reload - knowledge base admin

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, AppState};

/// Endpoints used by the chat UI.
pub fn chat_routes(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(handlers::chat))
        .route("/chatgpt", post(handlers::chatgpt))
        .route("/suggest", post(handlers::suggest))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Knowledge base admin endpoints, nested under `/api/v1`.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/kb", get(handlers::kb_stats))
        .route("/kb/reload", post(handlers::kb_reload))
        .fallback(handlers::api_not_found)
        .with_state(state)
}
