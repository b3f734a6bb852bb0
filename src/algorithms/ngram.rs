//! Sliding-window n-gram extraction
//!
//! Values no longer than the window are kept whole, so short emails or
//! phone numbers still produce exactly one token instead of none.

use smallvec::SmallVec;

/// Extract every contiguous run of `n` characters, sliding by one.
///
/// When the value has at most `n` characters (or `n` is zero) the whole
/// value is returned as the only gram, including the empty string.
#[must_use]
pub fn extract_ngrams(s: &str, n: usize) -> Vec<String> {
    let chars: SmallVec<[char; 64]> = s.chars().collect();
    if n == 0 || chars.len() <= n {
        return vec![s.to_string()];
    }
    chars.windows(n).map(|w| w.iter().collect()).collect()
}
