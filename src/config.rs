//! Tunable constants for a matching run
//!
//! The defaults reproduce the reference behaviour of the engine:
//! - edit-distance lookups accept tokens at most 1 edit apart
//! - numeric neighbours must lie within 10% of the probe value
//! - ages use a fixed base of 10, dates a base of roughly five years
//! - document scores follow the exponential weighted average with exponent 1.5

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

/// Roughly five years expressed in milliseconds.
pub const DEFAULT_DATE_RANGE_BASE_MILLIS: f64 = 157_770_000_000.0;

/// Batches at least this large warm their caches on the rayon pool.
pub const PARALLEL_THRESHOLD: usize = 100;

/// Configuration shared by the index, the matchers and the scoring functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Maximum Levenshtein distance for `EQUALITY_DISTANCE` lookups
    pub max_edit_distance: usize,
    /// Neighbourhood range used when an element does not set its own (0..1)
    pub neighborhood_range: f64,
    /// Base magnitude for `AGE` range queries
    pub age_range_base: f64,
    /// Base magnitude for `DATE` range queries, in milliseconds
    pub date_range_base_millis: f64,
    /// Score credited per unmatched child when aggregating documents
    pub unmatched_child_score: f64,
    /// Exponent applied to perfect child scores
    pub exponent: f64,
    /// Minimum batch size before caches are warmed in parallel
    pub parallel_threshold: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_edit_distance: 1,
            neighborhood_range: 0.9,
            age_range_base: 10.0,
            date_range_base_millis: DEFAULT_DATE_RANGE_BASE_MILLIS,
            unmatched_child_score: 0.5,
            exponent: 1.5,
            parallel_threshold: PARALLEL_THRESHOLD,
        }
    }
}

impl MatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_edit_distance(mut self, distance: usize) -> Self {
        self.max_edit_distance = distance;
        self
    }

    pub fn with_neighborhood_range(mut self, range: f64) -> Self {
        self.neighborhood_range = range;
        self
    }

    pub fn with_age_range_base(mut self, base: f64) -> Self {
        self.age_range_base = base;
        self
    }

    pub fn with_date_range_base_millis(mut self, base: f64) -> Self {
        self.date_range_base_millis = base;
        self
    }

    pub fn with_unmatched_child_score(mut self, score: f64) -> Self {
        self.unmatched_child_score = score;
        self
    }

    pub fn with_exponent(mut self, exponent: f64) -> Self {
        self.exponent = exponent;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Check that every value is finite and inside its domain.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.neighborhood_range) {
            return Err(MatchError::InvalidConfig(format!(
                "neighborhood_range must be within 0..=1, got {}",
                self.neighborhood_range
            )));
        }
        for (name, value) in [
            ("age_range_base", self.age_range_base),
            ("date_range_base_millis", self.date_range_base_millis),
            ("unmatched_child_score", self.unmatched_child_score),
            ("exponent", self.exponent),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MatchError::InvalidConfig(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}
