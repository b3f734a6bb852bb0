//! Element: one typed field value of a document
//!
//! An element owns its raw value and lazily caches the preprocessed value and
//! the distinct tokens derived from it. The back-reference to the owning
//! document is non-owning and set when the document is built.

use std::fmt;
use std::sync::{Arc, Weak};

use ahash::AHashSet;
use once_cell::sync::OnceCell;

use super::document::Document;
use super::types::{ElementClassification, ElementType, MatchType};
use super::value::Value;
use crate::error::{MatchError, Result};
use crate::function::preprocess::PreprocessFn;
use crate::function::tokenizer::TokenizerFn;

#[derive(Clone)]
pub struct Element {
    element_type: ElementType,
    value: Value,
    weight: f64,
    threshold: f64,
    neighborhood_range: Option<f64>,
    source: Option<bool>,
    preprocess: PreprocessFn,
    tokenizer: TokenizerFn,
    classification: ElementClassification,
    pub(crate) document: Weak<Document>,
    preprocessed: OnceCell<Value>,
    tokens: OnceCell<Vec<Value>>,
}

impl Element {
    pub fn builder() -> ElementBuilder {
        ElementBuilder::new()
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Raw value as supplied to the builder.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn variance(&self) -> Option<&str> {
        self.classification.variance.as_deref()
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn neighborhood_range(&self) -> Option<f64> {
        self.neighborhood_range
    }

    pub fn is_source(&self) -> Option<bool> {
        self.source
    }

    pub fn match_type(&self) -> MatchType {
        self.classification.match_type
    }

    pub fn classification(&self) -> &ElementClassification {
        &self.classification
    }

    /// Owning document, if the element has been attached to one that is still alive.
    pub fn document(&self) -> Option<Arc<Document>> {
        self.document.upgrade()
    }

    /// Preprocessed value, computed on first access.
    pub fn preprocessed_value(&self) -> &Value {
        self.preprocessed.get_or_init(|| (self.preprocess)(&self.value))
    }

    /// Distinct tokens in first-seen order, computed on first access.
    pub fn tokens(&self) -> Result<&[Value]> {
        self.tokens
            .get_or_try_init(|| -> Result<Vec<Value>> {
                let mut seen = AHashSet::new();
                let raw = (self.tokenizer)(self)?;
                Ok(raw.into_iter().filter(|t| seen.insert(t.clone())).collect())
            })
            .map(Vec::as_slice)
    }

    /// Number of distinct tokens; zero until tokenization has succeeded.
    pub fn token_count(&self) -> usize {
        self.tokens.get().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.preprocessed_value().is_empty()
    }

    /// Whether this element may look up candidates in the index. Either an
    /// element or its document flagged as non-source only serves as a target.
    pub fn can_probe(&self) -> bool {
        let document_source = self.document().and_then(|d| d.is_source());
        self.source != Some(false) && document_source != Some(false)
    }

    /// Same document as `other`. Documents are identified by key, so two
    /// copies of one record count as the same document.
    pub fn shares_document(&self, other: &Element) -> bool {
        if self.document.ptr_eq(&other.document) {
            return !self.document.ptr_eq(&Weak::new());
        }
        match (self.document(), other.document()) {
            (Some(ours), Some(theirs)) => ours.key() == theirs.key(),
            _ => false,
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("type", &self.element_type)
            .field("value", &self.value)
            .field("weight", &self.weight)
            .field("threshold", &self.threshold)
            .field("classification", &self.classification)
            .finish()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.element_type.name(), self.value)
    }
}

/// Builder for [`Element`]. Type and value are required; everything else
/// falls back to the field type's defaults.
#[derive(Default)]
pub struct ElementBuilder {
    element_type: Option<ElementType>,
    value: Option<Value>,
    variance: Option<String>,
    weight: Option<f64>,
    threshold: Option<f64>,
    neighborhood_range: Option<f64>,
    source: Option<bool>,
    preprocess: Option<PreprocessFn>,
    tokenizer: Option<TokenizerFn>,
    match_type: Option<MatchType>,
}

impl ElementBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, element_type: ElementType) -> Self {
        self.element_type = Some(element_type);
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Elements with different variance tags never match.
    pub fn with_variance(mut self, variance: impl Into<String>) -> Self {
        self.variance = Some(variance.into());
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_neighborhood_range(mut self, range: f64) -> Self {
        self.neighborhood_range = Some(range);
        self
    }

    pub fn with_source(mut self, source: bool) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_preprocessing(mut self, preprocess: PreprocessFn) -> Self {
        self.preprocess = Some(preprocess);
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: TokenizerFn) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    pub fn with_match_type(mut self, match_type: MatchType) -> Self {
        self.match_type = Some(match_type);
        self
    }

    pub fn build(self) -> Result<Element> {
        let element_type = self.element_type.ok_or(MatchError::MissingField("type"))?;
        let value = self.value.ok_or(MatchError::MissingField("value"))?;

        let weight = self.weight.unwrap_or(1.0);
        if !weight.is_finite() || weight < 0.0 {
            return Err(MatchError::InvalidConfig(format!(
                "element weight must be a finite non-negative number, got {weight}"
            )));
        }
        let threshold = self.threshold.unwrap_or(0.0);
        if !(0.0..=1.0).contains(&threshold) {
            return Err(MatchError::InvalidConfig(format!(
                "element threshold must be within 0..=1, got {threshold}"
            )));
        }
        if let Some(range) = self.neighborhood_range {
            if !(0.0..=1.0).contains(&range) {
                return Err(MatchError::InvalidConfig(format!(
                    "neighborhood range must be within 0..=1, got {range}"
                )));
            }
        }

        let match_type = self
            .match_type
            .unwrap_or_else(|| element_type.default_match_type());
        let element = Element {
            element_type,
            value,
            weight,
            threshold,
            neighborhood_range: self.neighborhood_range,
            source: self.source,
            preprocess: self
                .preprocess
                .unwrap_or_else(|| element_type.default_preprocess()),
            tokenizer: self
                .tokenizer
                .unwrap_or_else(|| element_type.default_tokenizer()),
            classification: ElementClassification::new(element_type, self.variance, match_type),
            document: Weak::new(),
            preprocessed: OnceCell::new(),
            tokens: OnceCell::new(),
        };

        if match_type == MatchType::NearestNeighbors {
            let preprocessed = element.preprocessed_value();
            if !preprocessed.is_empty() && !preprocessed.is_ordinal() {
                return Err(MatchError::unsupported("nearest neighbors", preprocessed.kind()));
            }
        }

        Ok(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::preprocess;
    use crate::function::tokenizer;

    #[test]
    fn test_defaults() {
        let element = ElementBuilder::new()
            .with_type(ElementType::Name)
            .with_value("James Parker")
            .build()
            .unwrap();
        assert_eq!(element.weight(), 1.0);
        assert_eq!(element.threshold(), 0.0);
        assert_eq!(element.match_type(), MatchType::Equality);
        assert_eq!(element.is_source(), None);
        assert!(element.document().is_none());
        assert!(element.can_probe());
    }

    #[test]
    fn test_preprocessed_value_is_cached() {
        let element = ElementBuilder::new()
            .with_type(ElementType::Text)
            .with_value("James Parker jr.")
            .build()
            .unwrap();
        let first = element.preprocessed_value() as *const Value;
        let second = element.preprocessed_value() as *const Value;
        assert_eq!(first, second);
        assert_eq!(element.preprocessed_value(), &Value::from("james parker jr"));
    }

    #[test]
    fn test_tokens_are_distinct() {
        let element = ElementBuilder::new()
            .with_type(ElementType::Address)
            .with_value("123 new Street new street")
            .build()
            .unwrap();
        let tokens: Vec<String> = element.tokens().unwrap().iter().map(|t| t.to_string()).collect();
        assert_eq!(tokens, vec!["123", "N000", "S363"]);
        assert_eq!(element.token_count(), 3);
    }

    #[test]
    fn test_overrides() {
        let element = ElementBuilder::new()
            .with_type(ElementType::Name)
            .with_value("Brian Wilson")
            .with_preprocessing(preprocess::to_lowercase())
            .with_tokenizer(tokenizer::word_tokenizer())
            .with_match_type(MatchType::EqualityDistance)
            .with_variance("self")
            .build()
            .unwrap();
        assert_eq!(element.preprocessed_value(), &Value::from("brian wilson"));
        assert_eq!(element.tokens().unwrap().len(), 2);
        assert_eq!(element.classification().match_type, MatchType::EqualityDistance);
        assert_eq!(element.variance(), Some("self"));
    }

    #[test]
    fn test_missing_fields() {
        let result = ElementBuilder::new().with_value("x").build();
        assert!(matches!(result, Err(MatchError::MissingField("type"))));
        let result = ElementBuilder::new().with_type(ElementType::Text).build();
        assert!(matches!(result, Err(MatchError::MissingField("value"))));
    }

    #[test]
    fn test_invalid_parameters() {
        let result = ElementBuilder::new()
            .with_type(ElementType::Age)
            .with_value(30)
            .with_neighborhood_range(1.2)
            .build();
        assert!(matches!(result, Err(MatchError::InvalidConfig(_))));

        let result = ElementBuilder::new()
            .with_type(ElementType::Text)
            .with_value("x")
            .with_threshold(-0.1)
            .build();
        assert!(matches!(result, Err(MatchError::InvalidConfig(_))));
    }

    #[test]
    fn test_nearest_neighbors_rejects_text_at_build() {
        let result = ElementBuilder::new()
            .with_type(ElementType::Date)
            .with_value("2020-01-01")
            .build();
        assert!(matches!(
            result,
            Err(MatchError::UnsupportedType { kind: "text", .. })
        ));

        let numeric = ElementBuilder::new()
            .with_type(ElementType::Number)
            .with_value("$ 45.50")
            .build()
            .unwrap();
        assert_eq!(numeric.preprocessed_value(), &Value::Double(45.5));

        let empty = ElementBuilder::new()
            .with_type(ElementType::Age)
            .with_value("")
            .build()
            .unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_shares_document_by_key() {
        use crate::domain::DocumentBuilder;

        let doc = DocumentBuilder::new("1")
            .with_element(
                ElementBuilder::new()
                    .with_type(ElementType::Name)
                    .with_value("James Parker")
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        let copy = doc.with_source(false);
        let other = DocumentBuilder::new("2")
            .with_elements(doc.elements().iter().map(|e| Element::clone(e)))
            .build()
            .unwrap();

        assert!(doc.elements()[0].shares_document(&copy.elements()[0]));
        assert!(!doc.elements()[0].shares_document(&other.elements()[0]));

        let detached = ElementBuilder::new()
            .with_type(ElementType::Name)
            .with_value("James Parker")
            .build()
            .unwrap();
        assert!(!detached.shares_document(&detached.clone()));
    }
}
