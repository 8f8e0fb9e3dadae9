//! Vector re-ranker: TF-IDF space over a shortlist plus the query, cosine scoring.
//!
//! Terms are unigrams and bigrams of lower-cased word tokens (two or more word
//! characters) with English stop-words removed before bigrams are formed.
//! Weights are `tf · idf` with smoothed `idf = ln((1 + n) / (1 + df)) + 1` and
//! every row is L2-normalized, so the dot product is the cosine similarity.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;

use super::normalize::word_tokens;
use crate::types::{FaqEntry, MatchResult};

/// Common English stop-words excluded from the vector space.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
    "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
    "amongst", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below",
    "beside", "besides", "between", "beyond", "both", "but", "by", "can", "cannot", "could",
    "did", "do", "does", "done", "down", "due", "during", "each", "eg", "either", "else",
    "elsewhere", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "for", "former", "formerly", "from", "further", "had",
    "has", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein", "hereupon",
    "hers", "herself", "him", "himself", "his", "how", "however", "i", "ie", "if", "in",
    "indeed", "into", "is", "it", "its", "itself", "just", "last", "latter", "latterly",
    "least", "less", "ltd", "many", "may", "me", "meanwhile", "might", "mine", "more",
    "moreover", "most", "mostly", "much", "must", "my", "myself", "namely", "neither",
    "never", "nevertheless", "next", "no", "nobody", "none", "noone", "nor", "not", "nothing",
    "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or",
    "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "per",
    "perhaps", "please", "rather", "re", "same", "seem", "seemed", "seeming", "seems",
    "several", "she", "should", "since", "so", "some", "somehow", "someone", "something",
    "sometime", "sometimes", "somewhere", "still", "such", "than", "that", "the", "their",
    "them", "themselves", "then", "thence", "there", "thereafter", "thereby", "therefore",
    "therein", "thereupon", "these", "they", "this", "those", "though", "through",
    "throughout", "thru", "thus", "to", "together", "too", "toward", "towards", "un",
    "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were", "what",
    "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas", "whereby",
    "wherein", "whereupon", "wherever", "whether", "which", "while", "whither", "who",
    "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without", "would",
    "yet", "you", "your", "yours", "yourself", "yourselves",
];

static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();

fn is_stop_word(token: &str) -> bool {
    STOP_WORDS
        .get_or_init(|| ENGLISH_STOP_WORDS.iter().copied().collect())
        .contains(token)
}

/// Unigram and bigram terms of `text`, in document order, repeats kept.
pub fn analyze(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = word_tokens(&lowered)
        .into_iter()
        .filter(|w| w.chars().count() >= 2 && !is_stop_word(w))
        .collect();

    let mut terms: Vec<String> = words.iter().map(|w| (*w).to_string()).collect();
    terms.extend(words.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
    terms
}

/// Sparse L2-normalized row: term index -> weight.
type SparseVec = HashMap<usize, f64>;

/// A fitted TF-IDF space over a small document set.
#[derive(Debug, Clone)]
pub struct TfIdfSpace {
    rows: Vec<SparseVec>,
}

impl TfIdfSpace {
    /// Fit the vocabulary and weights on `documents` and embed each of them.
    ///
    /// Returns `None` when the documents produce no terms at all.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Option<Self> {
        let analyzed: Vec<Vec<String>> = documents.iter().map(|d| analyze(d.as_ref())).collect();

        let mut vocabulary: BTreeMap<String, usize> = BTreeMap::new();
        for terms in &analyzed {
            for term in terms {
                let next = vocabulary.len();
                vocabulary.entry(term.clone()).or_insert(next);
            }
        }
        if vocabulary.is_empty() {
            return None;
        }

        let mut df = vec![0usize; vocabulary.len()];
        for terms in &analyzed {
            let unique: HashSet<usize> = terms.iter().filter_map(|t| vocabulary.get(t).copied()).collect();
            for idx in unique {
                df[idx] += 1;
            }
        }
        let n = documents.len() as f64;
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let rows = analyzed
            .iter()
            .map(|terms| {
                let mut row: SparseVec = HashMap::new();
                for term in terms {
                    if let Some(&idx) = vocabulary.get(term) {
                        *row.entry(idx).or_insert(0.0) += 1.0;
                    }
                }
                for (idx, weight) in &mut row {
                    *weight *= idf[*idx];
                }
                l2_normalize(&mut row);
                row
            })
            .collect();

        Some(Self { rows })
    }

    /// Cosine similarity between two fitted documents.
    pub fn cosine(&self, a: usize, b: usize) -> f64 {
        let (Some(x), Some(y)) = (self.rows.get(a), self.rows.get(b)) else {
            return 0.0;
        };
        let (small, large) = if x.len() <= y.len() { (x, y) } else { (y, x) };
        small
            .iter()
            .filter_map(|(idx, w)| large.get(idx).map(|v| w * v))
            .sum()
    }
}

fn l2_normalize(row: &mut SparseVec) {
    let norm = row.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for w in row.values_mut() {
            *w /= norm;
        }
    }
}

/// Cosine similarity of `query` to each candidate question, in candidate order.
///
/// Returns `None` when the shortlist is empty (no space is built) or when the
/// combined text has no usable terms.
pub fn score_candidates(query: &str, candidates: &[&FaqEntry]) -> Option<Vec<f64>> {
    if candidates.is_empty() {
        return None;
    }
    let mut documents: Vec<&str> = candidates.iter().map(|e| e.question_full.as_str()).collect();
    documents.push(query);

    let space = TfIdfSpace::fit(&documents)?;
    let query_row = candidates.len();
    Some((0..candidates.len()).map(|i| space.cosine(query_row, i)).collect())
}

/// Best candidate and its score. Ties resolve to the earliest candidate.
pub fn best_candidate(query: &str, candidates: &[&FaqEntry]) -> Option<(usize, f64)> {
    let scores = score_candidates(query, candidates)?;
    let mut best: Option<(usize, f64)> = None;
    for (i, score) in scores.into_iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best
}

/// Re-rank the shortlist and accept the winner only at or above `threshold`.
pub fn rerank(query: &str, candidates: &[&FaqEntry], threshold: f64) -> MatchResult {
    match best_candidate(query, candidates) {
        Some((idx, score)) if score >= threshold => {
            tracing::debug!(score, question = %candidates[idx].question_full, "Vector re-rank accepted");
            MatchResult::faq(candidates[idx].answer.clone())
        }
        Some((_, score)) => {
            tracing::debug!(score, threshold, "Vector re-rank below threshold");
            MatchResult::NoMatch
        }
        None => MatchResult::NoMatch,
    }
}
