//! Keyword matcher: substring and word-token matching against each entry's keyword list.
//!
//! Entries are scanned in knowledge-base order and the first qualifying entry wins.
//! There is no ranking here, so the load order of the FAQ file is the tie-breaker.

use std::collections::HashSet;

use super::normalize::word_tokens;
use crate::types::{FaqEntry, MatchResult};

/// Return the first entry whose keyword is a substring of `query` or equals one of its word tokens.
///
/// `query` must already be normalized. Keyword comparison is case-insensitive.
pub fn find_keyword_match<'a>(query: &str, entries: &'a [FaqEntry]) -> Option<&'a FaqEntry> {
    if query.is_empty() {
        return None;
    }
    let tokens: HashSet<&str> = word_tokens(query).into_iter().collect();

    entries.iter().find(|entry| {
        entry
            .normalized_keywords()
            .any(|kw| query.contains(kw.as_str()) || tokens.contains(kw.as_str()))
    })
}

/// Keyword matcher as a cascade stage.
pub fn keyword_match(query: &str, entries: &[FaqEntry]) -> MatchResult {
    match find_keyword_match(query, entries) {
        Some(entry) => MatchResult::faq(entry.answer.clone()),
        None => MatchResult::NoMatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kb() -> Vec<FaqEntry> {
        vec![
            FaqEntry::new("how do I reset my password", &["password", "reset"], "Visit the IT portal."),
            FaqEntry::new("how do I connect to wifi", &["wifi", "eduroam"], "Use eduroam."),
            FaqEntry::new("where do I change my password", &["password"], "Second entry."),
            FaqEntry::new("library hours", &[], "9 to 5."),
        ]
    }

    #[test]
    fn test_substring_match() {
        let entries = kb();
        let hit = find_keyword_match("i forgot my password", &entries).unwrap();
        assert_eq!(hit.answer, "Visit the IT portal.");
    }

    #[test]
    fn test_first_entry_wins() {
        let entries = kb();
        // Both entry 0 and entry 2 carry "password"; load order decides.
        for _ in 0..3 {
            let hit = find_keyword_match("password help", &entries).unwrap();
            assert_eq!(hit.question_full, "how do I reset my password");
        }
    }

    #[test]
    fn test_keyword_case_insensitive() {
        let entries = vec![FaqEntry::new("q", &["WiFi"], "a")];
        assert!(find_keyword_match("my wifi is slow", &entries).is_some());
    }

    #[test]
    fn test_multiword_keyword_substring() {
        let entries = vec![FaqEntry::new("q", &["student id"], "card office")];
        assert!(find_keyword_match("lost my student id card", &entries).is_some());
        assert!(find_keyword_match("student card id", &entries).is_none());
    }

    #[test]
    fn test_token_match_with_punctuation_keyword() {
        // Keyword equals a word token even when surrounded by punctuation.
        let entries = vec![FaqEntry::new("q", &["vpn"], "use the client")];
        assert!(find_keyword_match("(vpn)?", &entries).is_some());
    }

    #[test]
    fn test_no_match() {
        let entries = kb();
        assert_eq!(keyword_match("unrelated gibberish xyz", &entries), MatchResult::NoMatch);
    }

    #[test]
    fn test_entry_without_keywords_never_matches() {
        let entries = kb();
        assert!(find_keyword_match("library hours", &entries).is_none());
    }

    #[test]
    fn test_blank_keyword_ignored() {
        let entries = vec![FaqEntry::new("q", &["", "  "], "a")];
        assert!(find_keyword_match("anything at all", &entries).is_none());
    }

    #[test]
    fn test_empty_query() {
        assert!(find_keyword_match("", &kb()).is_none());
    }
}
