//! System-wide default constants.
//!
//! Grouped by subsystem. Every `Default` impl in `assist_config.rs` reads from here.

// ============================================================================
// Server
// ============================================================================

/// Default HTTP bind address.
pub const SERVER_ADDR: &str = "127.0.0.1:5000";

// ============================================================================
// Knowledge Base
// ============================================================================

/// Default FAQ file path, relative to the working directory.
pub const FAQ_PATH: &str = "data/faq.json";

/// How often the watcher checks FAQ file mtimes (seconds).
pub const WATCH_INTERVAL_SECS: u64 = 5;

/// Delay after a detected change before reloading (editors write in stages).
pub const WATCH_DEBOUNCE_MS: u64 = 500;

// ============================================================================
// Matching
// ============================================================================

/// Maximum number of approximate-match candidates passed to the re-ranker.
pub const SHORTLIST_SIZE: usize = 5;

/// Minimum gestalt similarity for a question to be shortlisted.
pub const SIMILARITY_CUTOFF: f64 = 0.3;

/// Minimum cosine similarity for the re-ranked winner to be accepted.
pub const RERANK_THRESHOLD: f64 = 0.2;

/// Default number of autocomplete suggestions (also the absolute cap).
pub const SUGGESTION_LIMIT: usize = 5;

// ============================================================================
// Messages
// ============================================================================

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a question.";

/// `{contact}` is replaced with `messages.support_contact`.
pub const NOT_FOUND_MESSAGE: &str =
    "Sorry, I couldn't find a matching FAQ. Please contact {contact}.";

pub const PROVIDER_APOLOGY_MESSAGE: &str =
    "Sorry, the assistant is temporarily unavailable. Please try again later.";

pub const SUPPORT_CONTACT: &str = "it@unsw.edu.au";

// ============================================================================
// Generative Provider
// ============================================================================

pub const LLM_BASE_URL: &str = "https://api.openai.com/v1";

pub const LLM_MODEL: &str = "gpt-4o-mini";

/// Environment variable holding the provider API key.
pub const LLM_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Upper bound on a single generative call, including connection time (seconds).
pub const LLM_TIMEOUT_SECS: u64 = 30;

pub const LLM_TEMPERATURE: f32 = 0.2;

pub const LLM_MAX_TOKENS: u32 = 512;
