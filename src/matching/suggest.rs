//! Suggestion engine for partially typed questions.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::similarity::close_matches;
use crate::types::FaqEntry;

/// Hard cap on returned suggestions, whatever the configured limit.
pub const MAX_SUGGESTIONS: usize = 5;

/// How suggestions are matched against the prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestPolicy {
    /// Keywords starting with the prefix, de-duplicated in first-seen order
    #[default]
    Prefix,
    /// Approximate match of the prefix against whole sample questions
    Approximate,
}

/// Suggestion engine parameters.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionEngine {
    pub policy: SuggestPolicy,
    pub limit: usize,
    pub cutoff: f64,
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self {
            policy: SuggestPolicy::Prefix,
            limit: MAX_SUGGESTIONS,
            cutoff: crate::config::defaults::SIMILARITY_CUTOFF,
        }
    }
}

impl SuggestionEngine {
    /// Suggestions for `prefix`. `samples` feeds the approximate policy; when it is
    /// empty the entries' full questions are used instead.
    pub fn suggest(&self, prefix: &str, entries: &[FaqEntry], samples: &[String]) -> Vec<String> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() {
            return Vec::new();
        }
        let limit = self.limit.min(MAX_SUGGESTIONS);

        match self.policy {
            SuggestPolicy::Prefix => prefix_suggestions(&prefix, entries, limit),
            SuggestPolicy::Approximate => {
                if samples.is_empty() {
                    let questions: Vec<&str> =
                        entries.iter().map(|e| e.question_full.as_str()).collect();
                    approximate_suggestions(&prefix, &questions, limit, self.cutoff)
                } else {
                    let samples: Vec<&str> = samples.iter().map(String::as_str).collect();
                    approximate_suggestions(&prefix, &samples, limit, self.cutoff)
                }
            }
        }
    }
}

/// Keywords (as stored) whose lower-cased form starts with `prefix`.
pub fn prefix_suggestions(prefix: &str, entries: &[FaqEntry], limit: usize) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for keyword in entries.iter().flat_map(|e| e.question_keywords.iter()) {
        if out.len() >= limit {
            break;
        }
        let trimmed = keyword.trim();
        let lowered = trimmed.to_lowercase();
        if !trimmed.is_empty() && lowered.starts_with(prefix) && seen.insert(lowered) {
            out.push(trimmed.to_string());
        }
    }
    out
}

/// Whole sample questions similar to `prefix`, best first, without repeats.
pub fn approximate_suggestions(prefix: &str, corpus: &[&str], limit: usize, cutoff: f64) -> Vec<String> {
    let lowered: Vec<String> = corpus.iter().map(|s| s.to_lowercase()).collect();
    let mut seen: HashSet<&str> = HashSet::new();

    close_matches(prefix, lowered.iter().map(String::as_str), corpus.len(), cutoff)
        .into_iter()
        .filter(|s| seen.insert(lowered[s.index].as_str()))
        .take(limit)
        .map(|s| corpus[s.index].to_string())
        .collect()
}
