//! Ranking error types

use thiserror::Error;

/// Errors that can occur while ranking candidates
#[derive(Debug, Clone, Error)]
pub enum RankError {
    /// Query or candidate missing or malformed where a string is required
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Scoring a single candidate could not complete. Batch operations skip
    /// the candidate and report this as a warning.
    #[error("cannot score candidate '{candidate}': {reason}")]
    Computation {
        candidate: String,
        reason: &'static str,
    },

    /// The positional span pattern failed to compile
    #[error("span pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

impl RankError {
    /// True for per-candidate failures that do not abort a batch
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RankError::Computation { .. })
    }
}

/// Result type for ranking operations
pub type Result<T> = std::result::Result<T, RankError>;
