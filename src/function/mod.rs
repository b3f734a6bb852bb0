//! Per-field functions: preprocessing, tokenization and score aggregation.

pub mod preprocess;
pub mod scoring;
pub mod tokenizer;

pub use preprocess::PreprocessFn;
pub use scoring::{ScoreContext, ScoringStrategy};
pub use tokenizer::TokenizerFn;
