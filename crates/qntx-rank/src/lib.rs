//! QNTX Fuzzy Ranking Library
//!
//! Ranks candidate strings against a partially typed query, for interactive
//! filtering of predicates, contexts, file names or commands. Each call
//! re-scans the candidates; nothing is indexed or cached.
//!
//! Output records keep input order. Sort them with
//! [`sort_best_first`] or any other order the caller prefers.
//!
//! # Features
//!
//! - `parallel` - Score large batches on the rayon pool (order is preserved)
//!
//! # Example
//!
//! ```rust
//! use qntx_rank::{fuzzy_match, sort_best_first};
//!
//! let mut matches = fuzzy_match("car", &["my car", "zzz", "card"]).unwrap();
//! sort_best_first(&mut matches);
//! assert_eq!(matches[0].result, "card");
//! ```
//!
//! The library is also exposed through a C ABI (see [`ffi`]) for embedding
//! from Go via CGO.

pub mod config;
pub mod error;
pub mod ffi;
pub mod fuzzy;

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// Re-export main types at crate root
pub use config::RankConfig;
pub use error::{RankError, Result};
pub use fuzzy::{fuzzy_match, sort_best_first, FuzzyMatcher, MatchResult, Measures, Ranking};

/// Initialize logging with the default `warn` filter.
///
/// The level can be controlled via `RUST_LOG`, e.g. `RUST_LOG=qntx_rank=trace`.
pub fn init_logger() {
    init_logger_with_filter("warn");
}

/// Initialize logging with a custom default filter. Only the first call has
/// any effect; later calls, or an already installed subscriber, are ignored.
pub fn init_logger_with_filter(default_filter: &str) {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init()
            .is_ok();

        if installed {
            tracing::debug!("QNTX rank library logging initialized");
        }
    });
}
