//! QNTX Fuzzy Ranking CLI
//!
//! Scores candidate lines from a file or stdin against a query and prints one
//! JSON record per admitted candidate.
//!
//! ## Usage
//!
//! ```bash
//! ls | qntx-rank crd
//! qntx-rank --sort --limit 10 "auth of" predicates.txt
//! ```
//!
//! ## Configuration
//!
//! Environment variables:
//! - `QNTX_RANK_PARALLEL_THRESHOLD`: batch size for parallel scoring (default: 1000)
//! - `QNTX_RANK_MAX_QUERY_LENGTH`: longest accepted query (default: 1000)
//! - `RUST_LOG`: Logging filter (overrides `--log-level`)

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, info, warn};

use qntx_rank::{sort_best_first, FuzzyMatcher, MatchResult, RankConfig, RankError};

#[derive(Parser, Debug)]
#[command(name = "qntx-rank")]
#[command(about = "Fuzzy-rank candidate lines against a query")]
#[command(version)]
struct Args {
    /// Query to match (whitespace is ignored)
    query: String,

    /// Read candidates from this file instead of stdin
    file: Option<PathBuf>,

    /// Sort best-first (reads all input before printing)
    #[arg(short, long)]
    sort: bool,

    /// Print at most N records
    #[arg(short, long)]
    limit: Option<usize>,

    /// Print one JSON array instead of one object per line
    #[arg(long)]
    json_array: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    qntx_rank::init_logger_with_filter(&args.log_level);

    let config = RankConfig::from_env();
    debug!(?config, "Loaded configuration");

    let matcher = FuzzyMatcher::with_config(&args.query, config)?;
    info!(query = %matcher.query(), "Ranking candidates");

    let reader: Box<dyn BufRead> = match &args.file {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin().lock())),
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if args.sort || args.json_array {
        let candidates = read_candidates(reader)?;
        let mut matches = matcher.rank(&candidates).matches;
        if args.sort {
            sort_best_first(&mut matches);
        }
        if let Some(limit) = args.limit {
            matches.truncate(limit);
        }

        if args.json_array {
            serde_json::to_writer(&mut out, &matches)?;
            writeln!(out)?;
        } else {
            for m in &matches {
                write_record(&mut out, m)?;
            }
        }
    } else {
        // Streaming: each line is scored as soon as it is read
        let limit = args.limit.unwrap_or(usize::MAX);
        let mut written = 0;
        for (lineno, line) in reader.lines().enumerate() {
            if written >= limit {
                break;
            }
            let line = line.map_err(|e| line_error(lineno, e))?;
            match matcher.score(&line) {
                Ok(Some(m)) => {
                    write_record(&mut out, &m)?;
                    written += 1;
                }
                Ok(None) => {}
                Err(e) => warn!(line = lineno + 1, error = %e, "Skipping candidate"),
            }
        }
    }

    out.flush()?;
    Ok(())
}

fn read_candidates(reader: Box<dyn BufRead>) -> Result<Vec<String>, RankError> {
    reader
        .lines()
        .enumerate()
        .map(|(lineno, line)| line.map_err(|e| line_error(lineno, e)))
        .collect()
}

fn line_error(lineno: usize, err: io::Error) -> RankError {
    RankError::InvalidInput(format!("line {}: {}", lineno + 1, err))
}

fn write_record<W: Write>(out: &mut W, m: &MatchResult) -> io::Result<()> {
    serde_json::to_writer(&mut *out, m)?;
    writeln!(out)
}
