//! Match orchestrator: the precision-first cascade.
//!
//! ```text
//! Start -> EmptyCheck -> VectorMatch -> KeywordFallback -> GenericFallback -> Done
//!              |              |               |
//!              v              v               v
//!            Done           Done            Done
//! ```
//!
//! The cascade is pure and synchronous. It reports `NotFound` from the generic
//! fallback state; turning that into text (static message or generative reply)
//! is the service's job.

use super::keyword::keyword_match;
use super::normalize::normalize_query;
use super::similarity::close_matches;
use super::vector::rerank;
use crate::config::MatchingConfig;
use crate::types::{FaqEntry, MatchOutcome, MatchResult, MatchStage};

/// Cascade states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeState {
    Start,
    EmptyCheck,
    VectorMatch,
    KeywordFallback,
    GenericFallback,
    Done(MatchOutcome),
}

/// Runs the cascade with fixed tuning parameters.
#[derive(Debug, Clone)]
pub struct MatchOrchestrator {
    shortlist_size: usize,
    similarity_cutoff: f64,
    rerank_threshold: f64,
}

impl Default for MatchOrchestrator {
    fn default() -> Self {
        Self::new(&MatchingConfig::default())
    }
}

impl MatchOrchestrator {
    pub fn new(config: &MatchingConfig) -> Self {
        Self {
            shortlist_size: config.shortlist_size,
            similarity_cutoff: config.similarity_cutoff,
            rerank_threshold: config.rerank_threshold,
        }
    }

    /// Run the whole cascade for a raw user query.
    pub fn run(&self, raw_query: &str, entries: &[FaqEntry]) -> MatchOutcome {
        let query = normalize_query(raw_query);
        let mut state = CascadeState::Start;
        loop {
            state = self.step(state, &query, entries);
            if let CascadeState::Done(outcome) = state {
                return outcome;
            }
        }
    }

    /// Advance one state. `query` must already be normalized.
    pub fn step(&self, state: CascadeState, query: &str, entries: &[FaqEntry]) -> CascadeState {
        match state {
            CascadeState::Start => CascadeState::EmptyCheck,
            CascadeState::EmptyCheck => {
                if query.is_empty() {
                    CascadeState::Done(MatchOutcome::EmptyQuery)
                } else {
                    CascadeState::VectorMatch
                }
            }
            CascadeState::VectorMatch => match self.vector_match(query, entries) {
                MatchResult::AnswerFound { text, .. } => CascadeState::Done(MatchOutcome::Matched {
                    answer: text,
                    stage: MatchStage::Vector,
                }),
                MatchResult::NoMatch => CascadeState::KeywordFallback,
            },
            CascadeState::KeywordFallback => match keyword_match(query, entries) {
                MatchResult::AnswerFound { text, .. } => CascadeState::Done(MatchOutcome::Matched {
                    answer: text,
                    stage: MatchStage::Keyword,
                }),
                MatchResult::NoMatch => CascadeState::GenericFallback,
            },
            CascadeState::GenericFallback => CascadeState::Done(MatchOutcome::NotFound),
            done @ CascadeState::Done(_) => done,
        }
    }

    /// Entries whose full question clears the similarity cutoff, best first.
    ///
    /// Questions are normalized like the query, so stored capitalization does not
    /// lower the score.
    pub fn shortlist<'a>(&self, query: &str, entries: &'a [FaqEntry]) -> Vec<&'a FaqEntry> {
        let questions: Vec<String> = entries.iter().map(|e| normalize_query(&e.question_full)).collect();
        close_matches(query, questions.iter().map(String::as_str), self.shortlist_size, self.similarity_cutoff)
            .into_iter()
            .map(|scored| &entries[scored.index])
            .collect()
    }

    fn vector_match(&self, query: &str, entries: &[FaqEntry]) -> MatchResult {
        let shortlist = self.shortlist(query, entries);
        if shortlist.is_empty() {
            tracing::debug!("No shortlist candidates, skipping vector re-rank");
            return MatchResult::NoMatch;
        }
        rerank(query, &shortlist, self.rerank_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kb() -> Vec<FaqEntry> {
        vec![
            FaqEntry::new(
                "how do I reset my password",
                &["password", "reset"],
                "Visit the IT portal.",
            ),
            FaqEntry::new("where is the main library", &["library"], "Building F21."),
            FaqEntry::new("how do I get a parking permit", &[], "Apply online."),
        ]
    }

    #[test]
    fn test_empty_query_short_circuits() {
        let orch = MatchOrchestrator::default();
        assert_eq!(orch.run("", &kb()), MatchOutcome::EmptyQuery);
        assert_eq!(orch.run("   \t ", &kb()), MatchOutcome::EmptyQuery);
    }

    #[test]
    fn test_empty_check_transitions() {
        let orch = MatchOrchestrator::default();
        assert_eq!(orch.step(CascadeState::Start, "", &[]), CascadeState::EmptyCheck);
        assert_eq!(
            orch.step(CascadeState::EmptyCheck, "", &[]),
            CascadeState::Done(MatchOutcome::EmptyQuery)
        );
        assert_eq!(orch.step(CascadeState::EmptyCheck, "hi", &[]), CascadeState::VectorMatch);
    }

    #[test]
    fn test_vector_stage_answers_full_question() {
        let orch = MatchOrchestrator::default();
        let outcome = orch.run("How do I get a parking permit?", &kb());
        assert_eq!(
            outcome,
            MatchOutcome::Matched {
                answer: "Apply online.".to_string(),
                stage: MatchStage::Vector
            }
        );
    }

    #[test]
    fn test_shortlist_ignores_stored_capitalization() {
        let orch = MatchOrchestrator::default();
        let entries = vec![FaqEntry::new("MFA SETUP", &[], "Use the authenticator app.")];
        assert_eq!(orch.shortlist("mfa setup", &entries).len(), 1);
        assert_eq!(
            orch.run("MFA setup", &entries),
            MatchOutcome::Matched {
                answer: "Use the authenticator app.".to_string(),
                stage: MatchStage::Vector
            }
        );
    }

    #[test]
    fn test_keyword_fallback_when_shortlist_empty() {
        let orch = MatchOrchestrator::default();
        let entries = vec![FaqEntry::new("opening times", &["library"], "9am to 5pm.")];
        // Too dissimilar to clear the similarity cutoff against the question.
        assert!(orch.shortlist("library?", &entries).is_empty());
        let outcome = orch.run("library?", &entries);
        assert_eq!(
            outcome,
            MatchOutcome::Matched {
                answer: "9am to 5pm.".to_string(),
                stage: MatchStage::Keyword
            }
        );
    }

    #[test]
    fn test_vector_no_match_moves_to_keyword() {
        let orch = MatchOrchestrator::default();
        let state = orch.step(CascadeState::VectorMatch, "zzzz", &kb());
        assert_eq!(state, CascadeState::KeywordFallback);
    }

    #[test]
    fn test_generic_fallback() {
        let orch = MatchOrchestrator::default();
        assert_eq!(orch.run("unrelated gibberish xyz", &kb()), MatchOutcome::NotFound);
    }

    #[test]
    fn test_empty_knowledge_base() {
        let orch = MatchOrchestrator::default();
        assert_eq!(orch.run("anything", &[]), MatchOutcome::NotFound);
    }

    #[test]
    fn test_shortlist_respects_size() {
        let entries: Vec<FaqEntry> = (0..10)
            .map(|i| FaqEntry::new(format!("question number {i}"), &[], "a"))
            .collect();
        let orch = MatchOrchestrator::default();
        assert_eq!(orch.shortlist("question number", &entries).len(), 5);
    }
}
