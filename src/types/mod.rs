//! Shared data structures for FAQ matching
//!
//! - `FaqEntry`: one knowledge-base record
//! - `MatchResult` / `MatchOutcome`: per-strategy and per-cascade results
//! - `Answer`: the payload every request path terminates in

mod answer;
mod faq;

pub use answer::*;
pub use faq::*;
