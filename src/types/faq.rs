//! Knowledge base record types

use serde::{Deserialize, Serialize};

/// One knowledge-base record pairing a canonical question, its keywords and an answer.
///
/// Serialized field names match the on-disk FAQ file:
///
/// ```json
/// { "question_full": "...", "question_keywords": ["..."], "answer": "..." }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    /// Canonical question text
    pub question_full: String,
    /// Keywords; order is irrelevant. May be empty, in which case the entry
    /// is only reachable through full-text matching.
    #[serde(default)]
    pub question_keywords: Vec<String>,
    /// Response text (never empty in a validated knowledge base)
    pub answer: String,
}

impl FaqEntry {
    pub fn new(
        question_full: impl Into<String>,
        question_keywords: &[&str],
        answer: impl Into<String>,
    ) -> Self {
        Self {
            question_full: question_full.into(),
            question_keywords: question_keywords.iter().map(|k| (*k).to_string()).collect(),
            answer: answer.into(),
        }
    }

    /// Keywords lower-cased and trimmed, with blanks removed.
    ///
    /// A blank keyword would be a substring of every query, so it never participates
    /// in keyword matching.
    pub fn normalized_keywords(&self) -> impl Iterator<Item = String> + '_ {
        self.question_keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keywords_default_to_empty() {
        let entry: FaqEntry =
            serde_json::from_str(r#"{"question_full": "q", "answer": "a"}"#).unwrap();
        assert!(entry.question_keywords.is_empty());
    }

    #[test]
    fn test_normalized_keywords_skip_blanks() {
        let entry = FaqEntry::new("q", &["  WiFi ", "", "   ", "Eduroam"], "a");
        let kws: Vec<String> = entry.normalized_keywords().collect();
        assert_eq!(kws, vec!["wifi".to_string(), "eduroam".to_string()]);
    }
}
