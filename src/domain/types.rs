//! Field types, match strategies and the classification that partitions
//! the token index.
//!
//! Every field type carries a default preprocessing function, tokenizer and
//! match strategy. Elements may override any of the three when built.

use serde::{Deserialize, Serialize};

use crate::function::preprocess::{self, PreprocessFn};
use crate::function::tokenizer::{self, TokenizerFn};

/// Closed set of field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementType {
    Name,
    Text,
    Address,
    Email,
    Phone,
    Number,
    Date,
    Age,
    Path,
    Id,
    Price,
}

/// How tokens of a classification are looked up in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchType {
    /// Exact token equality
    Equality,
    /// Tokens within a bounded Levenshtein distance
    EqualityDistance,
    /// Ordinal tokens inside a percentage range of the probe
    NearestNeighbors,
}

impl ElementType {
    pub fn name(&self) -> &'static str {
        match self {
            ElementType::Name => "NAME",
            ElementType::Text => "TEXT",
            ElementType::Address => "ADDRESS",
            ElementType::Email => "EMAIL",
            ElementType::Phone => "PHONE",
            ElementType::Number => "NUMBER",
            ElementType::Date => "DATE",
            ElementType::Age => "AGE",
            ElementType::Path => "PATH",
            ElementType::Id => "ID",
            ElementType::Price => "PRICE",
        }
    }

    pub fn default_preprocess(&self) -> PreprocessFn {
        match self {
            ElementType::Path => preprocess::path_preprocessing(),
            ElementType::Name => preprocess::name_preprocessing(),
            ElementType::Text => preprocess::remove_special_chars(),
            ElementType::Address => preprocess::address_preprocessing(),
            ElementType::Email => preprocess::remove_domain(),
            ElementType::Phone => preprocess::us_phone_normalization(),
            ElementType::Number | ElementType::Age => preprocess::number_preprocessing(),
            ElementType::Id => preprocess::id_preprocessing(),
            ElementType::Price => preprocess::trim(),
            ElementType::Date => preprocess::none(),
        }
    }

    pub fn default_tokenizer(&self) -> TokenizerFn {
        match self {
            ElementType::Path => tokenizer::path_tokenizer(),
            ElementType::Name | ElementType::Address => tokenizer::word_soundex_tokenizer(),
            ElementType::Text => tokenizer::word_tokenizer(),
            ElementType::Email => tokenizer::tri_gram_tokenizer(),
            ElementType::Phone => tokenizer::deca_gram_tokenizer(),
            ElementType::Id => tokenizer::id_tokenizer(),
            ElementType::Price => tokenizer::price_tokenizer(),
            ElementType::Number | ElementType::Age | ElementType::Date => {
                tokenizer::value_tokenizer()
            }
        }
    }

    pub fn default_match_type(&self) -> MatchType {
        match self {
            ElementType::Number | ElementType::Date | ElementType::Age => {
                MatchType::NearestNeighbors
            }
            ElementType::Id => MatchType::EqualityDistance,
            _ => MatchType::Equality,
        }
    }
}

/// Partition key of the token index. Elements of different classifications
/// never match each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementClassification {
    pub element_type: ElementType,
    pub variance: Option<String>,
    pub match_type: MatchType,
}

impl ElementClassification {
    pub fn new(element_type: ElementType, variance: Option<String>, match_type: MatchType) -> Self {
        Self {
            element_type,
            variance,
            match_type,
        }
    }
}
