//! Token index
//!
//! - Token repositories: one per element classification, looked up by
//!   equality, bounded edit distance or numeric/date neighbourhood
//! - Thread-safe wrapper: shared access to an index across threads

pub mod threadsafe;
pub mod token_index;

pub use threadsafe::ThreadSafeTokenIndex;
pub use token_index::{TokenIndex, TokenRepo};
