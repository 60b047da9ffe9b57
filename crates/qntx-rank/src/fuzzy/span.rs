//! Positional span matcher
//!
//! Compiles `q1.*?q2.*?...qk` (each query character escaped) and reports the
//! leftmost match in a candidate. Case-sensitive; `.` does not cross `\n`.

use regex::Regex;

use crate::error::Result;

/// Length and start of a span, both in characters. `(0, 0)` when nothing matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub length: usize,
    pub index: usize,
}

/// Compiled lazy span pattern for one query
#[derive(Debug, Clone)]
pub struct SpanPattern {
    regex: Option<Regex>,
}

impl SpanPattern {
    /// Compile the pattern for a whitespace-stripped query.
    /// An empty query compiles to nothing and always reports `(0, 0)`.
    pub fn new(query: &str) -> Result<Self> {
        if query.is_empty() {
            return Ok(Self { regex: None });
        }

        let mut buf = [0u8; 4];
        let pattern = query
            .chars()
            .map(|c| regex::escape(c.encode_utf8(&mut buf)))
            .collect::<Vec<_>>()
            .join(".*?");

        Ok(Self {
            regex: Some(Regex::new(&pattern)?),
        })
    }

    /// Leftmost lazy match of the query in `candidate`
    pub fn find(&self, candidate: &str) -> Span {
        let Some(regex) = &self.regex else {
            return Span::default();
        };

        match regex.find(candidate) {
            Some(m) => Span {
                length: m.as_str().chars().count(),
                index: candidate[..m.start()].chars().count(),
            },
            None => Span::default(),
        }
    }
}
