//! Quick filter: ordered-subsequence admission test
//!
//! Equivalent to the wildcard pattern `*q1*q2*...*qk*` applied
//! case-insensitively. Runs before any of the quadratic measures.

use super::strategies::fold_char;

/// Remove every whitespace character from a query
pub fn normalize_query(query: &str) -> String {
    query.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Case-insensitive subsequence test over a pre-folded query
#[derive(Debug, Clone)]
pub struct QuickFilter {
    folded: Vec<char>,
}

impl QuickFilter {
    /// Build a filter for an already whitespace-stripped query
    pub fn new(query: &str) -> Self {
        Self {
            folded: query.chars().map(fold_char).collect(),
        }
    }

    /// True when every query character appears in `candidate`, in order.
    /// Empty candidates are never admitted.
    pub fn admits(&self, candidate: &str) -> bool {
        if candidate.is_empty() {
            return false;
        }

        let mut pending = self.folded.iter().copied().peekable();
        for c in candidate.chars() {
            match pending.peek() {
                None => break,
                Some(&q) if q == fold_char(c) => {
                    pending.next();
                }
                Some(_) => {}
            }
        }
        pending.peek().is_none()
    }
}

/// One-shot form of [`QuickFilter::admits`]
pub fn is_subsequence(query: &str, candidate: &str) -> bool {
    QuickFilter::new(query).admits(candidate)
}
