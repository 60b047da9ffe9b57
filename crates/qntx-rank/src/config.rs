//! Ranking configuration
//!
//! Defaults can be overridden from the environment:
//! - `QNTX_RANK_PARALLEL_THRESHOLD`: batch size at which scoring goes parallel
//!   (only with the `parallel` feature)
//! - `QNTX_RANK_MAX_QUERY_LENGTH`: longest accepted query, in characters

use tracing::warn;

pub const PARALLEL_THRESHOLD_VAR: &str = "QNTX_RANK_PARALLEL_THRESHOLD";
pub const MAX_QUERY_LENGTH_VAR: &str = "QNTX_RANK_MAX_QUERY_LENGTH";

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankConfig {
    /// Minimum batch size before candidates are scored on the rayon pool
    pub parallel_threshold: usize,
    /// Queries longer than this (after whitespace removal) are rejected
    pub max_query_length: usize,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 1000,
            max_query_length: 1000,
        }
    }
}

impl RankConfig {
    /// Defaults overridden by `QNTX_RANK_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    /// Unparseable values are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = parse_usize(PARALLEL_THRESHOLD_VAR, lookup(PARALLEL_THRESHOLD_VAR)) {
            config.parallel_threshold = v;
        }
        if let Some(v) = parse_usize(MAX_QUERY_LENGTH_VAR, lookup(MAX_QUERY_LENGTH_VAR)) {
            config.max_query_length = v;
        }
        config
    }
}

fn parse_usize(key: &str, raw: Option<String>) -> Option<usize> {
    let raw = raw?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(var = key, value = %raw, "Ignoring invalid configuration value");
            None
        }
    }
}
