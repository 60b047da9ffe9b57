//! C-compatible FFI interface for the ranking engine
//!
//! Enables integration with Go via CGO.
//!
//! # Memory Ownership Rules
//!
//! - Result structs and their strings are owned by the caller after return
//! - `rank_result_free()` must be called to deallocate a result
//! - Strings returned on their own are freed with `rank_string_free()`

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;
use std::slice;
use std::time::Instant;

use tracing::debug;

use crate::error::RankError;
use crate::fuzzy::FuzzyMatcher;

// Safety limits
const MAX_CANDIDATES: usize = 1_000_000;

/// C-compatible scored candidate
#[repr(C)]
pub struct RankMatchC {
    pub score: i64,
    pub result: *mut c_char,
}

/// C-compatible result wrapper for rank_fuzzy_match
#[repr(C)]
pub struct RankResultC {
    pub success: bool,
    pub error_msg: *mut c_char,
    pub matches: *mut RankMatchC,
    pub matches_len: usize,
    /// Candidates skipped because they could not be scored
    pub warnings_len: usize,
    pub search_time_us: u64,
}

impl RankResultC {
    fn error(err: &RankError) -> Self {
        let msg = err.to_string();
        Self {
            success: false,
            error_msg: CString::new(msg)
                .unwrap_or_else(|_| CString::new("invalid error message").unwrap_or_default())
                .into_raw(),
            matches: ptr::null_mut(),
            matches_len: 0,
            warnings_len: 0,
            search_time_us: 0,
        }
    }

    fn invalid(msg: impl Into<String>) -> Self {
        Self::error(&RankError::InvalidInput(msg.into()))
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

#[no_mangle]
pub extern "C" fn rank_init_logger() {
    crate::init_logger();
}

// ============================================================================
// Ranking
// ============================================================================

/// Rank `candidates_len` NUL-terminated strings against `query`.
///
/// A null query, a null candidate array (with a non-zero length) or any null
/// candidate pointer fails the whole call.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn rank_fuzzy_match(
    query: *const c_char,
    candidates: *const *const c_char,
    candidates_len: usize,
) -> RankResultC {
    if query.is_null() {
        return RankResultC::invalid("null query pointer");
    }
    if candidates.is_null() && candidates_len > 0 {
        return RankResultC::invalid("null candidates pointer");
    }
    if candidates_len > MAX_CANDIDATES {
        return RankResultC::invalid("candidate count exceeds maximum");
    }

    let query_str = match unsafe { CStr::from_ptr(query) }.to_str() {
        Ok(s) => s,
        Err(_) => return RankResultC::invalid("invalid UTF-8 in query"),
    };

    let candidates_vec = match convert_string_array(candidates, candidates_len) {
        Ok(v) => v,
        Err(msg) => return RankResultC::invalid(msg),
    };

    let start = Instant::now();
    let matcher = match FuzzyMatcher::new(query_str) {
        Ok(m) => m,
        Err(e) => return RankResultC::error(&e),
    };
    let ranking = matcher.rank(&candidates_vec);
    let search_time_us = start.elapsed().as_micros() as u64;

    debug!(
        candidates = candidates_len,
        matches = ranking.matches.len(),
        search_time_us,
        "FFI rank completed"
    );

    let mut c_matches: Vec<RankMatchC> = Vec::with_capacity(ranking.matches.len());
    for m in ranking.matches {
        let result = match CString::new(m.result) {
            Ok(cs) => cs,
            Err(_) => return RankResultC::invalid("result contains null bytes"),
        };
        c_matches.push(RankMatchC {
            score: m.score,
            result: result.into_raw(),
        });
    }

    let (matches, matches_len) = vec_into_raw(c_matches);

    RankResultC {
        success: true,
        error_msg: ptr::null_mut(),
        matches,
        matches_len,
        warnings_len: ranking.warnings.len(),
        search_time_us,
    }
}

#[no_mangle]
pub extern "C" fn rank_result_free(result: RankResultC) {
    if !result.error_msg.is_null() {
        unsafe {
            let _ = CString::from_raw(result.error_msg);
        }
    }

    if !result.matches.is_null() && result.matches_len > 0 {
        let matches_slice =
            unsafe { slice::from_raw_parts_mut(result.matches, result.matches_len) };
        for m in matches_slice.iter() {
            if !m.result.is_null() {
                unsafe {
                    let _ = CString::from_raw(m.result);
                }
            }
        }
        unsafe {
            let _ = Box::from_raw(ptr::slice_from_raw_parts_mut(
                result.matches,
                result.matches_len,
            ));
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn rank_string_free(s: *mut c_char) {
    if !s.is_null() {
        unsafe {
            let _ = CString::from_raw(s);
        }
    }
}

#[no_mangle]
pub extern "C" fn rank_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

// ============================================================================
// Helpers
// ============================================================================

fn convert_string_array(arr: *const *const c_char, len: usize) -> Result<Vec<String>, String> {
    if arr.is_null() || len == 0 {
        return Ok(Vec::new());
    }

    let slice = unsafe { slice::from_raw_parts(arr, len) };
    let mut result = Vec::with_capacity(len);

    for (i, &ptr) in slice.iter().enumerate() {
        if ptr.is_null() {
            return Err(format!("null candidate at index {}", i));
        }
        match unsafe { CStr::from_ptr(ptr) }.to_str() {
            Ok(s) => result.push(s.to_string()),
            Err(_) => return Err(format!("invalid UTF-8 in candidate at index {}", i)),
        }
    }

    Ok(result)
}

fn vec_into_raw<T>(vec: Vec<T>) -> (*mut T, usize) {
    let len = vec.len();
    if len == 0 {
        (ptr::null_mut(), 0)
    } else {
        (Box::into_raw(vec.into_boxed_slice()) as *mut T, len)
    }
}
