//! Token: an indexable unit derived from an element

use std::sync::Arc;

use super::element::Element;
use super::types::ElementClassification;
use super::value::Value;
use crate::error::Result;

/// A token value borrowed from its owning element's cache.
#[derive(Debug, Clone, Copy)]
pub struct Token<'a> {
    pub value: &'a Value,
    pub element: &'a Arc<Element>,
}

impl<'a> Token<'a> {
    /// Every distinct token of `element`.
    pub fn of(element: &'a Arc<Element>) -> Result<Vec<Token<'a>>> {
        Ok(element
            .tokens()?
            .iter()
            .map(|value| Token { value, element })
            .collect())
    }

    pub fn classification(&self) -> &'a ElementClassification {
        self.element.classification()
    }
}
