//! FAQ Assist: FAQ answering backend
//!
//! Matches a free-text question against a curated knowledge base and returns
//! the best answer, with autocomplete suggestions for partial questions.
//!
//! ## Architecture
//!
//! - **Knowledge Base**: ordered FAQ snapshot, swapped atomically on reload
//! - **Matching**: approximate shortlist -> TF-IDF re-rank -> keyword fallback
//! - **LLM Module**: optional generative fallback behind a provider trait
//! - **API**: axum routes plus the embedded chat UI

pub mod api;
pub mod config;
pub mod knowledge_base;
pub mod llm;
pub mod matching;
pub mod service;
pub mod types;

pub use config::AssistConfig;
pub use knowledge_base::{KnowledgeBase, KnowledgeBaseError, KnowledgeStore};
pub use llm::{GenerativeBackend, ProviderError};
pub use matching::{MatchOrchestrator, SuggestionEngine};
pub use service::AssistService;
pub use types::{Answer, FaqEntry, MatchOutcome, MatchResult, MatchStage, SourceTag};
