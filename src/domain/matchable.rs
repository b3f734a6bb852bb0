//! The contract aggregation needs from anything that can be matched

use ahash::AHashSet;

use super::document::Document;
use super::element::Element;

/// Structural information used to score a pair of matchables.
pub trait Matchable {
    /// Children present on either side, counted with multiplicity.
    fn child_count(&self, other: &Self) -> usize;

    /// Children present on one side only, counted with multiplicity.
    fn unmatched_child_count(&self, other: &Self) -> usize;

    fn weight(&self) -> f64;
}

impl Matchable for Document {
    fn child_count(&self, other: &Self) -> usize {
        let ours = self.classification_counts();
        let theirs = other.classification_counts();
        let keys: AHashSet<_> = ours.keys().chain(theirs.keys()).collect();
        keys.into_iter()
            .map(|k| {
                let a = ours.get(*k).copied().unwrap_or(0);
                let b = theirs.get(*k).copied().unwrap_or(0);
                a.max(b)
            })
            .sum()
    }

    fn unmatched_child_count(&self, other: &Self) -> usize {
        let ours = self.classification_counts();
        let theirs = other.classification_counts();
        let keys: AHashSet<_> = ours.keys().chain(theirs.keys()).collect();
        keys.into_iter()
            .map(|k| {
                let a = ours.get(*k).copied().unwrap_or(0);
                let b = theirs.get(*k).copied().unwrap_or(0);
                a.abs_diff(b)
            })
            .sum()
    }

    fn weight(&self) -> f64 {
        1.0
    }
}

impl Matchable for Element {
    /// The larger distinct token count of the two elements.
    fn child_count(&self, other: &Self) -> usize {
        self.token_count().max(other.token_count())
    }

    fn unmatched_child_count(&self, other: &Self) -> usize {
        self.token_count().abs_diff(other.token_count())
    }

    fn weight(&self) -> f64 {
        Element::weight(self)
    }
}
