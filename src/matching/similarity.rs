//! Approximate text matching: gestalt (Ratcliff/Obershelp) similarity ratio and
//! close-match shortlisting.
//!
//! The ratio is `2·M / T` where `T` is the combined length of both sequences and
//! `M` the number of elements in matching blocks. Blocks are found by taking the
//! longest common substring, then recursing on the pieces to its left and right.
//! Sequences are compared as Unicode scalar values.

use std::cmp::Ordering;
use std::collections::HashMap;

/// Sequences at least this long get the popular-element heuristic applied.
const AUTOJUNK_MIN_LEN: usize = 200;

/// A matcher with a fixed second sequence, reusable against many first sequences.
///
/// Indexing the fixed side once keeps shortlisting a query against every
/// question in the knowledge base linear in the number of questions.
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    b: Vec<char>,
    /// Positions of each element in `b`, ascending. Popular elements removed.
    b2j: HashMap<char, Vec<usize>>,
}

impl SequenceMatcher {
    pub fn new(b: &str) -> Self {
        let b: Vec<char> = b.chars().collect();
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }

        // Elements making up more than 1% of a long sequence are treated as noise.
        let n = b.len();
        if n >= AUTOJUNK_MIN_LEN {
            let ntest = n / 100 + 1;
            b2j.retain(|_, idxs| idxs.len() <= ntest);
        }

        Self { b, b2j }
    }

    /// Similarity of `a` against the fixed sequence, in `[0, 1]`.
    pub fn ratio(&self, a: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let total = a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matched = self.matching_size(&a);
        2.0 * matched as f64 / total as f64
    }

    /// Upper bound on `ratio` computed from lengths alone.
    pub fn real_quick_ratio(&self, a: &str) -> f64 {
        let la = a.chars().count();
        let lb = self.b.len();
        let total = la + lb;
        if total == 0 {
            return 1.0;
        }
        2.0 * la.min(lb) as f64 / total as f64
    }

    /// Total number of elements in all matching blocks between `a` and `b`.
    fn matching_size(&self, a: &[char]) -> usize {
        let mut queue = vec![(0, a.len(), 0, self.b.len())];
        let mut matched = 0;

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.find_longest_match(a, alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        matched
    }

    /// Longest block `a[i..i+k] == b[j..j+k]` inside the given window.
    ///
    /// Among equally long blocks the one starting earliest in `a` wins, then
    /// earliest in `b`.
    fn find_longest_match(
        &self,
        a: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let b = &self.b;
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

        // j2len[j] = length of the longest block ending at a[i-1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(c) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j.checked_sub(1).and_then(|p| j2len.get(&p)).copied().unwrap_or(0) + 1;
                    next.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next;
        }

        // Popular elements are absent from b2j; grow the block across them.
        while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && a[best_i + best_size] == b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }
}

/// Similarity between two strings, in `[0, 1]`.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    SequenceMatcher::new(b).ratio(a)
}

/// A shortlisted candidate: its position in the input and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored {
    pub index: usize,
    pub score: f64,
}

/// Up to `limit` candidates whose similarity to `query` is at least `cutoff`,
/// best first. Equal scores keep input order.
pub fn close_matches<'a, I>(query: &str, candidates: I, limit: usize, cutoff: f64) -> Vec<Scored>
where
    I: IntoIterator<Item = &'a str>,
{
    if limit == 0 {
        return Vec::new();
    }
    let matcher = SequenceMatcher::new(query);

    let mut scored: Vec<Scored> = candidates
        .into_iter()
        .enumerate()
        .filter(|(_, text)| matcher.real_quick_ratio(text) >= cutoff)
        .map(|(index, text)| Scored {
            index,
            score: matcher.ratio(text),
        })
        .filter(|s| s.score >= cutoff)
        .collect();

    scored.sort_by(|x, y| y.score.partial_cmp(&x.score).unwrap_or(Ordering::Equal));
    scored.truncate(limit);
    scored
}
