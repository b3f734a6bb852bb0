//! Match results and scores

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::document::Document;

/// A score together with the weight it carries into aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub result: f64,
    pub weight: f64,
}

impl Score {
    pub fn new(result: f64, weight: f64) -> Self {
        Self { result, weight }
    }

    /// Result multiplied by weight
    pub fn weighted(&self) -> f64 {
        self.result * self.weight
    }
}

/// An ordered pair (subject, matched-with) and its score.
#[derive(Debug)]
pub struct Match<T> {
    data: Arc<T>,
    matched_with: Arc<T>,
    score: Score,
    child_scores: Vec<Score>,
}

impl<T> Match<T> {
    pub fn new(data: Arc<T>, matched_with: Arc<T>, score: Score) -> Self {
        Self {
            data,
            matched_with,
            score,
            child_scores: Vec::new(),
        }
    }

    pub fn with_child_scores(mut self, child_scores: Vec<Score>) -> Self {
        self.child_scores = child_scores;
        self
    }

    pub fn data(&self) -> &Arc<T> {
        &self.data
    }

    pub fn matched_with(&self) -> &Arc<T> {
        &self.matched_with
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// Shorthand for `score().result`.
    pub fn result(&self) -> f64 {
        self.score.result
    }

    pub fn child_scores(&self) -> &[Score] {
        &self.child_scores
    }

    pub(crate) fn set_score(&mut self, score: Score) {
        self.score = score;
    }

    /// The same pair seen from the other side, sharing scores.
    pub fn mirrored(&self) -> Self {
        Self {
            data: Arc::clone(&self.matched_with),
            matched_with: Arc::clone(&self.data),
            score: self.score,
            child_scores: self.child_scores.clone(),
        }
    }
}

impl<T> Clone for Match<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            matched_with: Arc::clone(&self.matched_with),
            score: self.score,
            child_scores: self.child_scores.clone(),
        }
    }
}

// Equality covers the pair only; the score is metadata.
impl PartialEq for Match<Document> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data && self.matched_with == other.matched_with
    }
}

impl Eq for Match<Document> {}

impl Hash for Match<Document> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.hash(state);
        self.matched_with.hash(state);
    }
}
