//! Fuzzy Ranking Engine
//!
//! Every candidate is trimmed, passed through a cheap ordered-subsequence
//! filter, then scored from four measures:
//!
//! 1. Levenshtein distance to the query (case-insensitive)
//! 2. Longest common substring length (case-insensitive)
//! 3. Leftmost lazy span `q1.*?q2.*?...qk` - its length and start (case-sensitive)
//! 4. Common prefix length (case-sensitive)
//!
//! `score = (100 - d) * lcs - span_len - span_index + prefix_len`
//!
//! # Example
//!
//! ```rust
//! use qntx_rank::fuzzy::FuzzyMatcher;
//!
//! let matcher = FuzzyMatcher::new("crd").unwrap();
//! let ranking = matcher.rank(&["Card", "Cartoon", "zzz"]);
//! assert_eq!(ranking.matches.len(), 1);
//! assert_eq!(ranking.matches[0].result, "Card");
//! ```

mod engine;
mod filter;
mod span;
mod strategies;

pub use engine::{fuzzy_match, sort_best_first, FuzzyMatcher, MatchResult, Measures, Ranking};
pub use filter::{is_subsequence, normalize_query, QuickFilter};
pub use span::{Span, SpanPattern};
pub use strategies::{
    common_prefix, fold, fold_char, levenshtein, longest_common_substring, normalized_levenshtein,
};
