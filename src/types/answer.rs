//! Match results and answer payload types

use serde::Serialize;
use std::fmt;

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceTag {
    /// Taken verbatim from a knowledge-base entry
    #[serde(rename = "FAQ")]
    Faq,
    /// Fixed system text (guidance, not-found, apology)
    Generic,
    /// Produced by the generative model
    Generative,
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceTag::Faq => write!(f, "FAQ"),
            SourceTag::Generic => write!(f, "Generic"),
            SourceTag::Generative => write!(f, "Generative"),
        }
    }
}

/// Result of a single matching strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    AnswerFound { text: String, source: SourceTag },
    NoMatch,
}

impl MatchResult {
    pub fn faq(text: impl Into<String>) -> Self {
        MatchResult::AnswerFound {
            text: text.into(),
            source: SourceTag::Faq,
        }
    }
}

/// Cascade stage that produced a knowledge-base answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
    /// Approximate shortlist + vector re-rank
    Vector,
    /// Keyword substring / word-token fallback
    Keyword,
}

impl fmt::Display for MatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStage::Vector => write!(f, "vector"),
            MatchStage::Keyword => write!(f, "keyword"),
        }
    }
}

/// Terminal outcome of the matching cascade, before fallback text is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Normalized query was empty; no matcher ran
    EmptyQuery,
    /// A knowledge-base entry answered the query
    Matched { answer: String, stage: MatchStage },
    /// Every strategy declined
    NotFound,
}

/// Final answer returned to a caller. Always well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub answer: String,
    pub source: SourceTag,
}

impl Answer {
    pub fn new(answer: impl Into<String>, source: SourceTag) -> Self {
        Self {
            answer: answer.into(),
            source,
        }
    }
}
