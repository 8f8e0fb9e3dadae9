//! FAQ matching engine
//!
//! - `keyword`: substring / word-token keyword matching (first entry wins)
//! - `similarity`: gestalt similarity ratio and close-match shortlisting
//! - `vector`: TF-IDF re-ranking of a shortlist
//! - `orchestrator`: the vector -> keyword -> generic cascade
//! - `suggest`: prefix / approximate autocomplete

pub mod keyword;
pub mod normalize;
pub mod orchestrator;
pub mod similarity;
pub mod suggest;
pub mod vector;

pub use keyword::{find_keyword_match, keyword_match};
pub use normalize::{normalize_query, word_tokens};
pub use orchestrator::{CascadeState, MatchOrchestrator};
pub use similarity::{close_matches, similarity_ratio, SequenceMatcher};
pub use suggest::{SuggestPolicy, SuggestionEngine, MAX_SUGGESTIONS};
pub use vector::{rerank, score_candidates, TfIdfSpace};
