//! Similarity measures
//!
//! All measures operate on Unicode scalar values. Case-insensitive variants
//! fold each character to its first lowercase mapping, so character counts
//! and positions stay aligned with the original input.

use std::borrow::Cow;

use strsim::{levenshtein as strsim_levenshtein, normalized_levenshtein as strsim_normalized};

/// Fold a character for case-insensitive comparison
#[inline]
pub fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Fold every character of `s`, keeping the character count unchanged
pub fn fold(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

#[inline]
fn maybe_fold(s: &str, ignore_case: bool) -> Cow<'_, str> {
    if ignore_case {
        Cow::Owned(fold(s))
    } else {
        Cow::Borrowed(s)
    }
}

/// Longest contiguous run of characters shared by `s1` and `s2`.
///
/// Characters of the result are taken from `s1`. Among runs of equal length
/// the first one reached scanning `s1` then `s2` wins: a new maximum that
/// starts where the recorded best starts extends it by one character, any
/// other new maximum replaces it.
pub fn longest_common_substring(s1: &str, s2: &str, ignore_case: bool) -> String {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    if a.is_empty() || b.is_empty() {
        return String::new();
    }

    let key = |c: char| if ignore_case { fold_char(c) } else { c };
    let a_key: Vec<char> = a.iter().copied().map(key).collect();
    let b_key: Vec<char> = b.iter().copied().map(key).collect();

    // Only the previous row of the suffix-length table is needed
    let mut prev = vec![0usize; b.len()];
    let mut curr = vec![0usize; b.len()];

    let mut max_len = 0;
    let mut best_start = 0;
    let mut best = String::new();

    for i in 0..a.len() {
        for j in 0..b.len() {
            if a_key[i] != b_key[j] {
                curr[j] = 0;
                continue;
            }

            curr[j] = if j == 0 { 1 } else { prev[j - 1] + 1 };

            if curr[j] > max_len {
                max_len = curr[j];
                let start = i + 1 - max_len;
                if start == best_start {
                    best.push(a[i]);
                } else {
                    best_start = start;
                    best = a[start..=i].iter().collect();
                }
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}

/// Levenshtein edit distance (insertions, deletions, substitutions)
pub fn levenshtein(s1: &str, s2: &str, ignore_case: bool) -> usize {
    strsim_levenshtein(&maybe_fold(s1, ignore_case), &maybe_fold(s2, ignore_case))
}

/// `1 - distance / max(len)`: 1.0 for identical strings, 0.0 for nothing in common
pub fn normalized_levenshtein(s1: &str, s2: &str, ignore_case: bool) -> f64 {
    strsim_normalized(&maybe_fold(s1, ignore_case), &maybe_fold(s2, ignore_case))
}

/// Case-sensitive shared leading run of `s1` and `s2`, at most `max_len` characters.
///
/// The bound falls back to the shorter input when unset or too large.
/// The returned slice borrows from `s1`.
pub fn common_prefix<'a>(s1: &'a str, s2: &str, max_len: Option<usize>) -> &'a str {
    let end = s1
        .char_indices()
        .zip(s2.chars())
        .take(max_len.unwrap_or(usize::MAX))
        .take_while(|((_, a), b)| a == b)
        .last()
        .map_or(0, |((idx, c), _)| idx + c.len_utf8());
    &s1[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcs_identical() {
        for s in ["a", "hello", "is_author_of", "日本語"] {
            assert_eq!(longest_common_substring(s, s, true), s);
        }
    }

    #[test]
    fn test_lcs_empty_inputs() {
        assert_eq!(longest_common_substring("", "abc", true), "");
        assert_eq!(longest_common_substring("abc", "", true), "");
        assert_eq!(longest_common_substring("abc", "xyz", true), "");
    }

    #[test]
    fn test_lcs_basic() {
        assert_eq!(longest_common_substring("card", "crd", true), "rd");
        assert_eq!(longest_common_substring("xabcab", "abc", true), "abc");
        assert_eq!(longest_common_substring("my car", "car", true), "car");
    }

    #[test]
    fn test_lcs_first_run_wins_ties() {
        // "ab" and "cd" are both length 2; "ab" is reached first
        assert_eq!(longest_common_substring("abxcd", "cdab", true), "ab");
        assert_eq!(longest_common_substring("cdxab", "abcd", true), "cd");
    }

    #[test]
    fn test_lcs_extends_run_at_same_start() {
        // The run starting at 0 grows a, ab, abc across successive rows
        assert_eq!(longest_common_substring("abcz", "zabc", true), "abc");
    }

    #[test]
    fn test_lcs_case_handling() {
        assert_eq!(longest_common_substring("HeLLo", "yellow", true), "eLLo");
        assert_eq!(longest_common_substring("HeLLo", "yellow", false), "e");
    }

    #[test]
    fn test_levenshtein_known_values() {
        assert_eq!(levenshtein("kitten", "sitting", true), 3);
        assert_eq!(levenshtein("card", "crd", true), 1);
        assert_eq!(levenshtein("", "abc", true), 3);
        assert_eq!(levenshtein("abc", "", true), 3);
    }

    #[test]
    fn test_levenshtein_properties() {
        for (a, b) in [("flaw", "lawn"), ("works_at", "wroks_at"), ("", "x"), ("ñandú", "nandu")] {
            assert_eq!(levenshtein(a, a, true), 0);
            assert_eq!(levenshtein(a, b, true), levenshtein(b, a, true));
        }
    }

    #[test]
    fn test_levenshtein_case_handling() {
        assert_eq!(levenshtein("Kitten", "KITTEN", true), 0);
        assert_eq!(levenshtein("Kitten", "KITTEN", false), 5);
    }

    #[test]
    fn test_normalized_levenshtein() {
        let sim = normalized_levenshtein("kitten", "sitting", true);
        assert!((sim - (1.0 - 3.0 / 7.0)).abs() < 1e-9);
        assert_eq!(normalized_levenshtein("Same", "same", true), 1.0);
        assert_eq!(normalized_levenshtein("", "", true), 1.0);
        assert_eq!(normalized_levenshtein("abc", "xyz", true), 0.0);
    }

    #[test]
    fn test_common_prefix() {
        assert_eq!(common_prefix("abc", "abd", None), "ab");
        assert_eq!(common_prefix("xyz", "abc", None), "");
        assert_eq!(common_prefix("ab", "abc", None), "ab");
        assert_eq!(common_prefix("abc", "abc", None), "abc");
    }

    #[test]
    fn test_common_prefix_bound() {
        assert_eq!(common_prefix("abcdef", "abcxyz", Some(2)), "ab");
        assert_eq!(common_prefix("abcdef", "abcxyz", Some(10)), "abc");
        assert_eq!(common_prefix("abc", "abc", Some(0)), "");
    }

    #[test]
    fn test_common_prefix_case_sensitive() {
        assert_eq!(common_prefix("Card", "crd", None), "");
        assert_eq!(common_prefix("ñandú", "ñaño", None), "ña");
    }
}
