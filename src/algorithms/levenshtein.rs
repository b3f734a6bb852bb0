//! Levenshtein (edit) distance
//!
//! Unit cost for insertion, deletion and substitution, computed over Unicode
//! scalar values with the classic dynamic-programming recurrence kept in a
//! single rolling row. The bounded variant abandons the table as soon as a
//! whole row exceeds the limit, which keeps `EQUALITY_DISTANCE` scans cheap.

use smallvec::SmallVec;

#[inline]
fn dp_distance_bounded(a: &[char], b: &[char], max_distance: usize) -> Option<usize> {
    if a.len().abs_diff(b.len()) > max_distance {
        return None;
    }
    if a.is_empty() || b.is_empty() {
        return Some(a.len().max(b.len()));
    }

    let (target, source) = if a.len() < b.len() { (a, b) } else { (b, a) };
    let width = target.len();

    let mut row: SmallVec<[usize; 64]> = (0..=width).collect();

    for (i, &sc) in source.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        let mut row_min = row[0];

        for (j, &tc) in target.iter().enumerate() {
            let cost = usize::from(sc != tc);
            let cell = (diagonal + cost).min(row[j + 1] + 1).min(row[j] + 1);
            diagonal = row[j + 1];
            row[j + 1] = cell;
            row_min = row_min.min(cell);
        }

        // Row minima never decrease, so the final cell cannot recover
        if row_min > max_distance {
            return None;
        }
    }

    Some(row[width]).filter(|&d| d <= max_distance)
}

/// Levenshtein distance check with an upper bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Levenshtein {
    pub max_distance: usize,
}

impl Levenshtein {
    pub fn with_max_distance(max_distance: usize) -> Self {
        Self { max_distance }
    }

    /// Distance between `a` and `b`, or `None` when it exceeds the bound.
    pub fn compute(&self, a: &str, b: &str) -> Option<usize> {
        levenshtein_bounded(a, b, self.max_distance)
    }

    /// True when `a` and `b` are within the bound.
    pub fn is_within(&self, a: &str, b: &str) -> bool {
        self.compute(a, b).is_some()
    }
}

/// Levenshtein distance, or `None` when it exceeds `max_distance`.
#[inline]
#[must_use]
pub fn levenshtein_bounded(a: &str, b: &str, max_distance: usize) -> Option<usize> {
    if a == b {
        return Some(0);
    }
    let a: SmallVec<[char; 32]> = a.chars().collect();
    let b: SmallVec<[char; 32]> = b.chars().collect();
    dp_distance_bounded(&a, &b, max_distance)
}
