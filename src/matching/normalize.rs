//! Query normalization and tokenization shared by every matcher.

use regex::Regex;
use std::sync::OnceLock;

static WORD_RE: OnceLock<Regex> = OnceLock::new();

fn word_regex() -> &'static Regex {
    #[allow(clippy::expect_used)]
    WORD_RE.get_or_init(|| Regex::new(r"\w+").expect("word pattern is a valid regex"))
}

/// Trim surrounding whitespace and lower-case.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Split text into runs of word characters (Unicode aware), dropping everything else.
///
/// `"what's the wi-fi?"` yields `["what", "s", "the", "wi", "fi"]`.
pub fn word_tokens(text: &str) -> Vec<&str> {
    word_regex().find_iter(text).map(|m| m.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize_query("  How Do I RESET?  "), "how do i reset?");
        assert_eq!(normalize_query(" \t\n "), "");
    }

    #[test]
    fn test_word_tokens_split_on_non_word() {
        assert_eq!(word_tokens("what's the wi-fi?"), vec!["what", "s", "the", "wi", "fi"]);
        assert!(word_tokens("?!...").is_empty());
    }

    #[test]
    fn test_word_tokens_unicode() {
        assert_eq!(word_tokens("café übung"), vec!["café", "übung"]);
    }
}
