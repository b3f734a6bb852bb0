//! FuzzyMatch - Multi-field fuzzy record matching
//!
//! Finds documents (records made of typed fields) that plausibly describe
//! the same entity. Every field is preprocessed and tokenized according to
//! its type, tokens are looked up in a per-classification index, and the
//! element scores are aggregated into one score per document pair.
//!
//! # Features
//! - Field types with default preprocessing, tokenizers and match strategies
//! - Equality, edit-distance and nearest-neighbour token lookups
//! - Weighted, exponential score aggregation with per-document thresholds
//! - One-directional matching against read-only reference lists
//! - Grouping of pairwise matches into duplicate groups
//!
//! # Example
//! ```
//! use fuzzymatch::{DocumentBuilder, ElementBuilder, ElementType, MatchService};
//!
//! let doc = |key: &str, name: &str| {
//!     DocumentBuilder::new(key)
//!         .with_element(
//!             ElementBuilder::new()
//!                 .with_type(ElementType::Name)
//!                 .with_value(name)
//!                 .build()
//!                 .unwrap(),
//!         )
//!         .build()
//!         .unwrap()
//! };
//! let result = MatchService::new()
//!     .apply_match(&[doc("1", "Brian Wilson"), doc("2", "Bryan Wilkson")])
//!     .unwrap();
//! assert_eq!(result.len(), 2);
//! ```

pub mod algorithms;
pub mod config;
pub mod dedup;
pub mod domain;
pub mod error;
pub mod function;
pub mod indexing;
pub mod matching;
pub mod service;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::MatchConfig;
pub use dedup::{group_matches, DuplicateGroup};
pub use domain::{
    Document, DocumentBuilder, Element, ElementBuilder, ElementClassification, ElementType,
    Match, MatchType, Matchable, Score, Token, Value,
};
pub use error::{MatchError, Result};
pub use function::{PreprocessFn, ScoringStrategy, TokenizerFn};
pub use indexing::{ThreadSafeTokenIndex, TokenIndex};
pub use matching::{match_documents, DocumentMatcher, ElementMatcher, MatchStream};
pub use service::{MatchService, MatchesByKey};
