//! String algorithms used by the tokenizers and the token index

pub mod levenshtein;
pub mod ngram;
pub mod normalize;
pub mod phonetic;

pub use levenshtein::*;
pub use ngram::*;
pub use normalize::*;
pub use phonetic::*;
