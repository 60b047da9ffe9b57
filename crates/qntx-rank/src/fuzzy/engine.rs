//! FuzzyMatcher - per-candidate scoring pipeline

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, trace, warn};

#[cfg(all(not(target_arch = "wasm32"), feature = "parallel"))]
use rayon::prelude::*;

use super::filter::{normalize_query, QuickFilter};
use super::span::{Span, SpanPattern};
use super::strategies::{common_prefix, levenshtein, longest_common_substring};
use crate::config::RankConfig;
use crate::error::{RankError, Result};

/// A scored candidate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MatchResult {
    pub score: i64,
    /// The trimmed candidate
    pub result: String,
}

/// Raw measures for one admitted candidate, before combination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Measures {
    pub edit_distance: usize,
    pub common_substring_len: usize,
    pub span: Span,
    pub common_prefix_len: usize,
}

impl Measures {
    /// Combine the measures:
    ///
    /// ```text
    /// (100 - edit_distance) * common_substring_len
    ///     - span.length - span.index + common_prefix_len
    /// ```
    ///
    /// Returns `None` on overflow. A negative intermediate is multiplied as is.
    pub fn combine(&self) -> Option<i64> {
        let int = |n: usize| i64::try_from(n).ok();

        let mut score: i64 = 100;
        score = score.checked_sub(int(self.edit_distance)?)?;
        score = score.checked_mul(int(self.common_substring_len)?)?;
        score = score.checked_sub(int(self.span.length)?)?;
        score = score.checked_sub(int(self.span.index)?)?;
        if self.common_prefix_len > 0 {
            score = score.checked_add(int(self.common_prefix_len)?)?;
        }
        Some(score)
    }
}

/// Output of a batch: records in input order plus skipped-candidate warnings
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    pub matches: Vec<MatchResult>,
    pub warnings: Vec<RankError>,
}

/// Query prepared once and reused across candidates
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    query: String,
    filter: QuickFilter,
    span: SpanPattern,
    config: RankConfig,
}

impl FuzzyMatcher {
    /// Prepare `query` with the default configuration
    pub fn new(query: &str) -> Result<Self> {
        Self::with_config(query, RankConfig::default())
    }

    /// Prepare `query` with a custom configuration
    pub fn with_config(query: &str, config: RankConfig) -> Result<Self> {
        let query = normalize_query(query);

        let query_len = query.chars().count();
        if query_len > config.max_query_length {
            return Err(RankError::InvalidInput(format!(
                "query has {} characters, maximum is {}",
                query_len, config.max_query_length
            )));
        }

        let filter = QuickFilter::new(&query);
        let span = SpanPattern::new(&query)?;

        Ok(Self {
            query,
            filter,
            span,
            config,
        })
    }

    /// The whitespace-stripped query
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn config(&self) -> &RankConfig {
        &self.config
    }

    /// Measures for `candidate` (trimmed here), or `None` if the quick filter rejects it
    pub fn measure(&self, candidate: &str) -> Option<Measures> {
        let candidate = candidate.trim();
        if !self.filter.admits(candidate) {
            return None;
        }

        Some(Measures {
            edit_distance: levenshtein(candidate, &self.query, true),
            common_substring_len: longest_common_substring(candidate, &self.query, true)
                .chars()
                .count(),
            span: self.span.find(candidate),
            common_prefix_len: common_prefix(candidate, &self.query, None).chars().count(),
        })
    }

    /// Score a single candidate.
    ///
    /// `Ok(None)` means the quick filter rejected it; `Err` is a
    /// [`RankError::Computation`] for this candidate only.
    pub fn score(&self, candidate: &str) -> Result<Option<MatchResult>> {
        let Some(measures) = self.measure(candidate) else {
            return Ok(None);
        };

        let trimmed = candidate.trim();
        let score = measures.combine().ok_or_else(|| RankError::Computation {
            candidate: trimmed.to_string(),
            reason: "score arithmetic overflowed",
        })?;

        trace!(candidate = trimmed, score, ?measures, "Scored candidate");

        Ok(Some(MatchResult {
            score,
            result: trimmed.to_string(),
        }))
    }

    /// Score a batch. Records keep input order; failing candidates are
    /// skipped and collected as warnings.
    pub fn rank<S>(&self, candidates: &[S]) -> Ranking
    where
        S: AsRef<str> + Sync,
    {
        let start = Instant::now();

        let mut ranking = Ranking::default();
        for outcome in self.score_all(candidates) {
            match outcome {
                Ok(Some(m)) => ranking.matches.push(m),
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "Skipping candidate");
                    ranking.warnings.push(e);
                }
            }
        }

        debug!(
            query = %self.query,
            candidates = candidates.len(),
            matches = ranking.matches.len(),
            warnings = ranking.warnings.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Ranked candidates"
        );

        ranking
    }

    /// Lazily score candidates as they arrive. Failing candidates are logged
    /// and skipped.
    pub fn rank_iter<'a, I>(&'a self, candidates: I) -> impl Iterator<Item = MatchResult> + 'a
    where
        I: IntoIterator + 'a,
        I::Item: AsRef<str>,
    {
        candidates
            .into_iter()
            .filter_map(move |c| match self.score(c.as_ref()) {
                Ok(m) => m,
                Err(e) => {
                    warn!(error = %e, "Skipping candidate");
                    None
                }
            })
    }

    /// Score on the rayon pool for large batches (native + `parallel` only)
    #[cfg(all(not(target_arch = "wasm32"), feature = "parallel"))]
    fn score_all<S>(&self, candidates: &[S]) -> Vec<Result<Option<MatchResult>>>
    where
        S: AsRef<str> + Sync,
    {
        if candidates.len() >= self.config.parallel_threshold {
            // Indexed collect keeps input order
            candidates
                .par_iter()
                .map(|c| self.score(c.as_ref()))
                .collect()
        } else {
            self.score_sequential(candidates)
        }
    }

    #[cfg(any(target_arch = "wasm32", not(feature = "parallel")))]
    fn score_all<S>(&self, candidates: &[S]) -> Vec<Result<Option<MatchResult>>>
    where
        S: AsRef<str> + Sync,
    {
        self.score_sequential(candidates)
    }

    fn score_sequential<S>(&self, candidates: &[S]) -> Vec<Result<Option<MatchResult>>>
    where
        S: AsRef<str>,
    {
        candidates.iter().map(|c| self.score(c.as_ref())).collect()
    }
}

/// Rank `candidates` against `query`, returning records in input order.
///
/// Candidates that cannot be scored are logged and left out.
pub fn fuzzy_match<S>(query: &str, candidates: &[S]) -> Result<Vec<MatchResult>>
where
    S: AsRef<str> + Sync,
{
    Ok(FuzzyMatcher::new(query)?.rank(candidates).matches)
}

/// Sort by score descending, then by result for stability
pub fn sort_best_first(matches: &mut [MatchResult]) {
    matches.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.result.cmp(&b.result)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(query: &str, candidate: &str) -> Option<i64> {
        FuzzyMatcher::new(query)
            .unwrap()
            .score(candidate)
            .unwrap()
            .map(|m| m.score)
    }

    #[test]
    fn test_known_scores() {
        // (100 - 1) * 2, no span (case-sensitive), no prefix
        assert_eq!(scored("crd", "Card"), Some(198));
        // (100 - 4) * 3
        assert_eq!(scored("car", "Cartoon"), Some(288));
        // (100 - 1) * 3 - 3 - 0 + 3
        assert_eq!(scored("car", "card"), Some(297));
        // (100 - 3) * 3 - 3 - 3
        assert_eq!(scored("car", "my car"), Some(285));
    }

    #[test]
    fn test_rejected_candidates() {
        assert_eq!(scored("crd", "zzz"), None);
        assert_eq!(scored("crd", "Cartoon"), None);
        assert_eq!(scored("", "   "), None);
    }

    #[test]
    fn test_negative_intermediate_is_multiplied() {
        // 100 - 200 = -100, * 1, - 202 - 0, + 1
        let candidate = format!("a{}b", "x".repeat(200));
        assert_eq!(scored("ab", &candidate), Some(-301));
    }

    #[test]
    fn test_no_common_substring_collapses_to_zero() {
        let m = Measures {
            edit_distance: 3,
            common_substring_len: 0,
            span: Span::default(),
            common_prefix_len: 0,
        };
        assert_eq!(m.combine(), Some(0));
    }

    #[test]
    fn test_combine_overflow() {
        let m = Measures {
            edit_distance: 0,
            common_substring_len: usize::MAX / 2,
            span: Span::default(),
            common_prefix_len: 0,
        };
        assert_eq!(m.combine(), None);
    }

    #[test]
    fn test_empty_query_scores_zero() {
        assert_eq!(scored("", " foo "), Some(0));
        assert_eq!(scored("  \t", "bar"), Some(0));
    }

    #[test]
    fn test_candidate_trimmed_in_result() {
        let matcher = FuzzyMatcher::new("foo").unwrap();
        let m = matcher.score("  foo bar \n").unwrap().unwrap();
        assert_eq!(m.result, "foo bar");
    }

    #[test]
    fn test_query_whitespace_removed() {
        let matcher = FuzzyMatcher::new(" c r d ").unwrap();
        assert_eq!(matcher.query(), "crd");
        assert_eq!(scored(" c r d ", "Card"), scored("crd", "Card"));
    }

    #[test]
    fn test_query_too_long() {
        let config = RankConfig {
            max_query_length: 3,
            ..Default::default()
        };
        let err = FuzzyMatcher::with_config("abcd", config).unwrap_err();
        assert!(matches!(err, RankError::InvalidInput(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_rank_preserves_input_order() {
        let matcher = FuzzyMatcher::new("car").unwrap();
        let ranking = matcher.rank(&["my car", "zzz", "card", "Cartoon"]);
        let results: Vec<&str> = ranking.matches.iter().map(|m| m.result.as_str()).collect();
        assert_eq!(results, vec!["my car", "card", "Cartoon"]);
        assert!(ranking.warnings.is_empty());
    }

    #[test]
    fn test_rank_iter_matches_batch() {
        let candidates = vec!["my car".to_string(), "zzz".into(), "card".into()];
        let matcher = FuzzyMatcher::new("car").unwrap();
        let streamed: Vec<MatchResult> = matcher.rank_iter(candidates.iter()).collect();
        assert_eq!(streamed, matcher.rank(&candidates).matches);
    }

    #[test]
    fn test_sort_best_first() {
        let mut matches = vec![
            MatchResult { score: 10, result: "b".into() },
            MatchResult { score: 30, result: "c".into() },
            MatchResult { score: 10, result: "a".into() },
        ];
        sort_best_first(&mut matches);
        let order: Vec<&str> = matches.iter().map(|m| m.result.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_serialized_field_names() {
        let m = MatchResult { score: 198, result: "Card".into() };
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"Score":198,"Result":"Card"}"#);
    }
}
