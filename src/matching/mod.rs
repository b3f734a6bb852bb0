//! Matching pipeline: element-level token matching and document-level
//! aggregation over a shared token index.

pub mod document_match;
pub mod element_match;

pub use document_match::{match_documents, DocumentMatcher, MatchStream};
pub use element_match::ElementMatcher;
