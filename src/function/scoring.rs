//! Scoring strategies for combining element scores into a document score
//!
//! Every strategy receives the child scores that matched, plus two counts
//! describing how structurally comparable the pair is:
//! - `child_count`: classifications present on either side (with multiplicity)
//! - `unmatched_count`: classifications present on one side only
//!
//! Unmatched children are credited a partial score (0.5 by default) so that
//! a field missing on one side is neither a hit nor a full miss.

use serde::{Deserialize, Serialize};

use crate::config::MatchConfig;
use crate::domain::Score;

/// Scoring strategy for combining child scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScoringStrategy {
    /// `(Σ r + unmatched) / child_count`
    Average,
    /// `Σ r / child_count`
    SimpleAverage,
    /// `(Σ w·r + unmatched) / (Σ w + child_count - n)`
    WeightedAverage,
    /// Like `ExponentialWeightedAverage` with every weight set to 1
    ExponentialAverage,
    /// Weighted average where two or more perfect scores are boosted by
    /// raising their weighted sum to `exponent`
    #[default]
    ExponentialWeightedAverage,
}

/// Inputs shared by every strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreContext {
    pub child_count: f64,
    pub unmatched_count: f64,
    pub unmatched_child_score: f64,
    pub exponent: f64,
}

impl ScoreContext {
    pub fn new(child_count: f64, unmatched_count: f64, config: &MatchConfig) -> Self {
        Self {
            child_count,
            unmatched_count,
            unmatched_child_score: config.unmatched_child_score,
            exponent: config.exponent,
        }
    }

    fn unmatched_score(&self) -> f64 {
        self.unmatched_count * self.unmatched_child_score
    }
}

fn is_perfect(score: &Score) -> bool {
    score.result >= 1.0
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

fn average(children: &[Score], ctx: &ScoreContext) -> f64 {
    let sum: f64 = children.iter().map(|s| s.result).sum();
    ratio(sum + ctx.unmatched_score(), ctx.child_count)
}

fn simple_average(children: &[Score], ctx: &ScoreContext) -> f64 {
    let sum: f64 = children.iter().map(|s| s.result).sum();
    ratio(sum, ctx.child_count)
}

fn weighted_average(children: &[Score], ctx: &ScoreContext) -> f64 {
    let weighted: f64 = children.iter().map(Score::weighted).sum();
    let weights: f64 = children.iter().map(|s| s.weight).sum();
    ratio(
        weighted + ctx.unmatched_score(),
        weights + ctx.child_count - children.len() as f64,
    )
}

fn exponential_average(children: &[Score], ctx: &ScoreContext) -> f64 {
    let (perfect, rest): (Vec<&Score>, Vec<&Score>) = children.iter().partition(|s| is_perfect(s));
    if perfect.len() <= 1 {
        return average(children, ctx);
    }
    let boosted = (perfect.len() as f64).powf(ctx.exponent);
    let rest_sum: f64 = rest.iter().map(|s| s.result).sum();
    ratio(
        boosted + rest_sum + ctx.unmatched_score(),
        boosted + ctx.child_count - perfect.len() as f64,
    )
}

fn exponential_weighted_average(children: &[Score], ctx: &ScoreContext) -> f64 {
    let (perfect, rest): (Vec<&Score>, Vec<&Score>) = children.iter().partition(|s| is_perfect(s));
    let perfect_weighted: f64 = perfect.iter().map(|s| s.weighted()).sum();
    if perfect.len() <= 1 || perfect_weighted <= 1.0 {
        return weighted_average(children, ctx);
    }
    let perfect_weights: f64 = perfect.iter().map(|s| s.weight).sum();
    let rest_weighted: f64 = rest.iter().map(|s| s.weighted()).sum();
    let rest_weights: f64 = rest.iter().map(|s| s.weight).sum();
    ratio(
        perfect_weighted.powf(ctx.exponent) + rest_weighted + ctx.unmatched_score(),
        perfect_weights.powf(ctx.exponent) + rest_weights + ctx.child_count
            - children.len() as f64,
    )
}

impl ScoringStrategy {
    /// Combine child scores using this strategy
    pub fn combine(&self, children: &[Score], ctx: &ScoreContext) -> f64 {
        match self {
            ScoringStrategy::Average => average(children, ctx),
            ScoringStrategy::SimpleAverage => simple_average(children, ctx),
            ScoringStrategy::WeightedAverage => weighted_average(children, ctx),
            ScoringStrategy::ExponentialAverage => exponential_average(children, ctx),
            ScoringStrategy::ExponentialWeightedAverage => {
                exponential_weighted_average(children, ctx)
            }
        }
    }

    /// Get the strategy name
    pub fn name(&self) -> &'static str {
        match self {
            ScoringStrategy::Average => "average",
            ScoringStrategy::SimpleAverage => "simple_average",
            ScoringStrategy::WeightedAverage => "weighted_average",
            ScoringStrategy::ExponentialAverage => "exponential_average",
            ScoringStrategy::ExponentialWeightedAverage => "exponential_weighted_average",
        }
    }
}

/// Element level score: matched tokens over the larger distinct token count.
pub fn token_ratio(matched_tokens: usize, child_count: usize) -> f64 {
    if child_count == 0 {
        return 0.0;
    }
    (matched_tokens as f64 / child_count as f64).min(1.0)
}
