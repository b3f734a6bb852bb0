//! Error types for the matching pipeline
//!
//! Matching itself never fails on data: empty values, single documents and
//! missing matches are normal outcomes. Errors are reserved for caller
//! defects, such as a strategy applied to a value kind it cannot handle.

use thiserror::Error;

/// Errors raised while building elements or running a match.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    /// A tokenizer or index strategy received a value kind it cannot handle
    #[error("Data type not supported for {operation}: {kind}")]
    UnsupportedType {
        operation: &'static str,
        kind: &'static str,
    },

    /// A builder was finished without a mandatory field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MatchError {
    pub(crate) fn unsupported(operation: &'static str, kind: &'static str) -> Self {
        MatchError::UnsupportedType { operation, kind }
    }
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, MatchError>;
