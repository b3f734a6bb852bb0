//! Tokenizer functions
//!
//! A tokenizer turns an element's preprocessed value into the tokens that
//! are looked up in, and then inserted into, the token index. Duplicate
//! tokens are removed by the element, not here.

use std::sync::Arc;

use crate::algorithms::ngram::extract_ngrams;
use crate::algorithms::phonetic::soundex;
use crate::domain::{Element, Value};
use crate::error::{MatchError, Result};

/// Shared, thread-safe tokenizer closure.
pub type TokenizerFn = Arc<dyn Fn(&Element) -> Result<Vec<Value>> + Send + Sync>;

fn words(value: &Value) -> Option<Vec<&str>> {
    match value {
        Value::Text(s) => Some(s.split_whitespace().collect()),
        Value::TextList(items) => Some(items.iter().flat_map(|s| s.split_whitespace()).collect()),
        _ => None,
    }
}

fn ngrams(value: &Value, n: usize) -> Result<Vec<Value>> {
    match value {
        Value::Text(s) => Ok(extract_ngrams(s, n).into_iter().map(Value::Text).collect()),
        other => Err(MatchError::unsupported("n-gram tokenizer", other.kind())),
    }
}

/// The whole preprocessed value as a single token.
pub fn value_tokenizer() -> TokenizerFn {
    Arc::new(|element| Ok(vec![element.preprocessed_value().clone()]))
}

/// Whitespace-separated words.
pub fn word_tokenizer() -> TokenizerFn {
    Arc::new(|element| {
        let value = element.preprocessed_value();
        Ok(match words(value) {
            Some(words) => words.into_iter().map(Value::from).collect(),
            None => vec![value.clone()],
        })
    })
}

/// Words encoded as Soundex. Words containing digits (house numbers,
/// "23rd") are kept verbatim.
pub fn word_soundex_tokenizer() -> TokenizerFn {
    Arc::new(|element| {
        let value = element.preprocessed_value();
        let Some(words) = words(value) else {
            return Ok(vec![value.clone()]);
        };
        Ok(words
            .into_iter()
            .map(|word| {
                if word.chars().any(|c| c.is_ascii_digit()) {
                    return Value::from(word);
                }
                let code = soundex(word);
                if code.is_empty() {
                    Value::from(word)
                } else {
                    Value::Text(code)
                }
            })
            .collect())
    })
}

/// Non-empty path segments.
pub fn path_tokenizer() -> TokenizerFn {
    Arc::new(|element| {
        let value = element.preprocessed_value();
        Ok(match value {
            Value::Text(s) => s
                .split('/')
                .map(str::trim)
                .filter(|segment| !segment.is_empty())
                .map(Value::from)
                .collect(),
            other => vec![other.clone()],
        })
    })
}

/// Sliding n-grams of width `n`; shorter values stay whole.
pub fn ngram_tokenizer(n: usize) -> TokenizerFn {
    Arc::new(move |element| ngrams(element.preprocessed_value(), n))
}

pub fn tri_gram_tokenizer() -> TokenizerFn {
    ngram_tokenizer(3)
}

pub fn deca_gram_tokenizer() -> TokenizerFn {
    ngram_tokenizer(10)
}

/// 4-grams, paired with edit-distance lookups for identifiers.
pub fn id_tokenizer() -> TokenizerFn {
    ngram_tokenizer(4)
}

/// N-grams whose width is the number of digits in the raw value.
pub fn price_tokenizer() -> TokenizerFn {
    Arc::new(|element| {
        let digits = match element.value() {
            Value::Text(s) => s.chars().filter(char::is_ascii_digit).count(),
            other => other.to_string().chars().filter(char::is_ascii_digit).count(),
        };
        ngrams(element.preprocessed_value(), digits)
    })
}

/// Concatenate the tokens of several tokenizers, in order.
pub fn chain_tokenizers(tokenizers: Vec<TokenizerFn>) -> TokenizerFn {
    Arc::new(move |element| {
        let mut tokens = Vec::new();
        for tokenizer in &tokenizers {
            tokens.extend(tokenizer(element)?);
        }
        Ok(tokens)
    })
}
