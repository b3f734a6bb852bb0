//! Document: a keyed record made of elements
//!
//! Identity (equality and hashing) is the key alone. Elements are
//! deduplicated by (preprocessed value, classification) before matching, and
//! empty values are left out.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use once_cell::sync::OnceCell;

use super::element::Element;
use super::types::ElementClassification;
use super::value::Value;
use crate::error::{MatchError, Result};
use crate::function::ScoringStrategy;

#[derive(Debug)]
pub struct Document {
    key: String,
    threshold: f64,
    source: Option<bool>,
    scoring_strategy: ScoringStrategy,
    elements: Vec<Arc<Element>>,
    preprocessed: OnceCell<Vec<Arc<Element>>>,
}

impl Document {
    pub fn builder(key: impl Into<String>) -> DocumentBuilder {
        DocumentBuilder::new(key)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// `None` and `Some(true)` both allow mirrored matches.
    pub fn is_source(&self) -> Option<bool> {
        self.source
    }

    /// Strategy combining element scores when this document is the subject.
    pub fn scoring_strategy(&self) -> ScoringStrategy {
        self.scoring_strategy
    }

    /// All elements as added to the builder.
    pub fn elements(&self) -> &[Arc<Element>] {
        &self.elements
    }

    /// Distinct, non-empty elements in insertion order, computed once.
    pub fn preprocessed_elements(&self) -> &[Arc<Element>] {
        self.preprocessed.get_or_init(|| {
            let mut seen: AHashSet<(Value, ElementClassification)> = AHashSet::new();
            self.elements
                .iter()
                .filter(|e| !e.is_empty())
                .filter(|e| {
                    seen.insert((e.preprocessed_value().clone(), e.classification().clone()))
                })
                .cloned()
                .collect()
        })
    }

    /// Preprocess and tokenize every element ahead of matching.
    pub fn warm_up(&self) -> Result<()> {
        for element in self.preprocessed_elements() {
            element.tokens()?;
        }
        Ok(())
    }

    pub(crate) fn classification_counts(&self) -> AHashMap<&ElementClassification, usize> {
        let mut counts = AHashMap::new();
        for element in self.preprocessed_elements() {
            *counts.entry(element.classification()).or_insert(0) += 1;
        }
        counts
    }

    /// Copy of this document with a different source flag. Elements are
    /// cloned so their back-references point at the copy.
    pub fn with_source(&self, source: bool) -> Arc<Document> {
        DocumentBuilder {
            key: self.key.clone(),
            threshold: self.threshold,
            source: Some(source),
            scoring_strategy: self.scoring_strategy,
            elements: self.elements.iter().map(|e| Element::clone(e)).collect(),
        }
        .assemble()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Document {}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ordered: Vec<&Arc<Element>> = self.elements.iter().collect();
        ordered.sort_by_key(|e| e.element_type());
        let parts: Vec<String> = ordered.iter().map(|e| e.to_string()).collect();
        write!(f, "{}{{{}}}", self.key, parts.join(", "))
    }
}

/// Builder for [`Document`].
pub struct DocumentBuilder {
    key: String,
    threshold: f64,
    source: Option<bool>,
    scoring_strategy: ScoringStrategy,
    elements: Vec<Element>,
}

impl DocumentBuilder {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            threshold: 0.5,
            source: None,
            scoring_strategy: ScoringStrategy::default(),
            elements: Vec::new(),
        }
    }

    /// Document score must exceed this value to match (default 0.5).
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Mark the document as a source (`true`) or reference-only (`false`).
    pub fn with_source(mut self, source: bool) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_scoring_strategy(mut self, strategy: ScoringStrategy) -> Self {
        self.scoring_strategy = strategy;
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn with_elements(mut self, elements: impl IntoIterator<Item = Element>) -> Self {
        self.elements.extend(elements);
        self
    }

    pub fn build(self) -> Result<Arc<Document>> {
        if self.key.is_empty() {
            return Err(MatchError::MissingField("key"));
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(MatchError::InvalidConfig(format!(
                "document threshold must be a finite non-negative number, got {}",
                self.threshold
            )));
        }
        Ok(self.assemble())
    }

    fn assemble(self) -> Arc<Document> {
        let DocumentBuilder {
            key,
            threshold,
            source,
            scoring_strategy,
            elements,
        } = self;
        Arc::new_cyclic(|weak| Document {
            key,
            threshold,
            source,
            scoring_strategy,
            elements: elements
                .into_iter()
                .map(|mut element| {
                    element.document = weak.clone();
                    Arc::new(element)
                })
                .collect(),
            preprocessed: OnceCell::new(),
        })
    }
}
