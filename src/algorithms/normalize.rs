//! Text normalization primitives
//!
//! Folding goes through Unicode NFKD so accented letters keep their base
//! letter instead of being stripped along with punctuation.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold accents, keep ASCII letters, digits and spaces, lowercase, and
/// collapse whitespace.
#[must_use]
pub fn normalize_strict(s: &str) -> String {
    let kept: String = s
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    collapse_whitespace(&kept)
}

/// Trim and join whitespace-separated words with single spaces.
#[must_use]
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
