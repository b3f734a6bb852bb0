//! Preprocessing functions
//!
//! A preprocessing function maps a raw element value to the value that is
//! tokenized and used for deduplication. Text functions leave other value
//! kinds untouched, so they can be composed freely:
//!
//! ```
//! use fuzzymatch::function::preprocess::{compose, remove_special_chars, replace};
//! use fuzzymatch::Value;
//!
//! let f = compose(remove_special_chars(), replace("jr", ""));
//! assert_eq!(f(&Value::from("James Parker jr.")), Value::from("james parker"));
//! ```

use std::sync::Arc;

use ahash::AHashMap;
use once_cell::sync::Lazy;

use crate::algorithms::normalize::{collapse_whitespace, normalize_strict};
use crate::domain::Value;

/// Shared, thread-safe preprocessing closure.
pub type PreprocessFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Word substitutions applied by a dictionary step; an empty target drops the word.
pub type Dictionary = AHashMap<String, String>;

static NAME_DICTIONARY: Lazy<Dictionary> = Lazy::new(|| {
    [
        "jr", "sr", "ii", "iii", "iv", "mr", "mrs", "ms", "miss", "dr", "prof", "llc", "inc",
        "ltd", "limited", "corp", "corporation", "co", "company", "incorporated", "pvt", "plc",
    ]
    .into_iter()
    .map(|word| (word.to_string(), String::new()))
    .collect()
});

static ADDRESS_DICTIONARY: Lazy<Dictionary> = Lazy::new(|| {
    [
        ("st", "street"),
        ("str", "street"),
        ("ave", "avenue"),
        ("av", "avenue"),
        ("rd", "road"),
        ("dr", "drive"),
        ("blvd", "boulevard"),
        ("ln", "lane"),
        ("ct", "court"),
        ("pl", "place"),
        ("sq", "square"),
        ("hwy", "highway"),
        ("pkwy", "parkway"),
        ("cir", "circle"),
        ("ste", "suite"),
        ("apt", "apartment"),
        ("fl", "florida"),
        ("n", "north"),
        ("s", "south"),
        ("e", "east"),
        ("w", "west"),
        ("ne", "northeast"),
        ("nw", "northwest"),
        ("se", "southeast"),
        ("sw", "southwest"),
        ("al", "alabama"),
        ("ak", "alaska"),
        ("az", "arizona"),
        ("ar", "arkansas"),
        ("ca", "california"),
        ("co", "colorado"),
        ("de", "delaware"),
        ("ga", "georgia"),
        ("hi", "hawaii"),
        ("id", "idaho"),
        ("il", "illinois"),
        ("ia", "iowa"),
        ("ks", "kansas"),
        ("ky", "kentucky"),
        ("la", "louisiana"),
        ("me", "maine"),
        ("md", "maryland"),
        ("ma", "massachusetts"),
        ("mi", "michigan"),
        ("mn", "minnesota"),
        ("ms", "mississippi"),
        ("mo", "missouri"),
        ("mt", "montana"),
        ("nv", "nevada"),
        ("nh", "new hampshire"),
        ("nj", "new jersey"),
        ("nm", "new mexico"),
        ("ny", "new york"),
        ("nc", "north carolina"),
        ("nd", "north dakota"),
        ("oh", "ohio"),
        ("ok", "oklahoma"),
        ("or", "oregon"),
        ("pa", "pennsylvania"),
        ("ri", "rhode island"),
        ("sc", "south carolina"),
        ("sd", "south dakota"),
        ("tn", "tennessee"),
        ("tx", "texas"),
        ("ut", "utah"),
        ("vt", "vermont"),
        ("va", "virginia"),
        ("wa", "washington"),
        ("wv", "west virginia"),
        ("wi", "wisconsin"),
        ("wy", "wyoming"),
    ]
    .into_iter()
    .map(|(abbr, word)| (abbr.to_string(), word.to_string()))
    .collect()
});

fn map_text(value: &Value, f: impl Fn(&str) -> String) -> Value {
    match value {
        Value::Text(s) => Value::Text(f(s)),
        other => other.clone(),
    }
}

fn apply_dictionary(s: &str, dictionary: &Dictionary) -> String {
    let words: Vec<&str> = s
        .split_whitespace()
        .map(|word| dictionary.get(word).map_or(word, String::as_str))
        .filter(|word| !word.is_empty())
        .collect();
    words.join(" ")
}

/// `second(first(value))`
pub fn compose(first: PreprocessFn, second: PreprocessFn) -> PreprocessFn {
    Arc::new(move |value| second(&first(value)))
}

/// Identity.
pub fn none() -> PreprocessFn {
    Arc::new(Value::clone)
}

pub fn trim() -> PreprocessFn {
    Arc::new(|value| map_text(value, |s| s.trim().to_string()))
}

pub fn to_lowercase() -> PreprocessFn {
    Arc::new(|value| map_text(value, str::to_lowercase))
}

/// Literal substring replacement.
pub fn replace(from: &str, to: &str) -> PreprocessFn {
    let (from, to) = (from.to_string(), to.to_string());
    Arc::new(move |value| map_text(value, |s| s.replace(&from, &to).trim().to_string()))
}

/// Fold accents, keep ASCII letters, digits and spaces, lowercase, trim.
pub fn remove_special_chars() -> PreprocessFn {
    Arc::new(|value| map_text(value, normalize_strict))
}

/// Strip a trailing run of digits.
pub fn remove_trailing_number() -> PreprocessFn {
    Arc::new(|value| {
        map_text(value, |s| {
            s.trim()
                .trim_end_matches(|c: char| c.is_ascii_digit())
                .to_string()
        })
    })
}

/// Keep the local part of an email address.
pub fn remove_domain() -> PreprocessFn {
    Arc::new(|value| {
        map_text(value, |s| {
            let local = s.split_once('@').map_or(s, |(local, _)| local);
            local.trim().to_lowercase()
        })
    })
}

/// Replace whole words through `dictionary`, dropping words mapped to "".
pub fn dictionary_replace(dictionary: Dictionary) -> PreprocessFn {
    Arc::new(move |value| map_text(value, |s| apply_dictionary(s, &dictionary)))
}

/// Name normalization: drops trailing numbers, punctuation and
/// suffixes such as "jr" or "llc".
pub fn name_preprocessing() -> PreprocessFn {
    compose(
        compose(remove_trailing_number(), remove_special_chars()),
        Arc::new(|value| map_text(value, |s| apply_dictionary(s, &NAME_DICTIONARY))),
    )
}

/// Address normalization: expands street suffixes, directions and state codes.
pub fn address_preprocessing() -> PreprocessFn {
    compose(
        remove_special_chars(),
        Arc::new(|value| map_text(value, |s| apply_dictionary(s, &ADDRESS_DICTIONARY))),
    )
}

/// Digits only, with a leading country code `1` added to 10-digit numbers.
pub fn us_phone_normalization() -> PreprocessFn {
    Arc::new(|value| {
        map_text(value, |s| {
            let digits: String = s.chars().filter(char::is_ascii_digit).collect();
            if digits.len() == 10 {
                format!("1{digits}")
            } else {
                digits
            }
        })
    })
}

/// Extract a number from text. Text without digits, or whose digits do not
/// form a number, is returned unchanged.
pub fn number_preprocessing() -> PreprocessFn {
    Arc::new(|value| match value {
        Value::Text(s) => {
            let numeric: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            if !numeric.chars().any(|c| c.is_ascii_digit()) {
                return value.clone();
            }
            numeric
                .parse::<f64>()
                .map(Value::Double)
                .unwrap_or_else(|_| value.clone())
        }
        other => other.clone(),
    })
}

/// Canonical path: `/` separators, clean segments, no file extension.
pub fn path_preprocessing() -> PreprocessFn {
    Arc::new(|value| {
        map_text(value, |s| {
            let unified = s.trim().replace('\\', "/");
            let mut segments: Vec<String> = unified
                .split('/')
                .map(|segment| {
                    segment
                        .trim()
                        .chars()
                        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ' '))
                        .collect()
                })
                .collect();
            if let Some(last) = segments.last_mut() {
                if let Some(dot) = last.rfind('.').filter(|&i| i > 0) {
                    last.truncate(dot);
                }
            }
            for segment in &mut segments {
                segment.retain(|c| c != '.');
            }
            segments.join("/")
        })
    })
}

/// Flatten a list value into one space-separated string.
pub fn string_list_preprocessing() -> PreprocessFn {
    Arc::new(|value| match value {
        Value::TextList(items) => Value::Text(collapse_whitespace(&items.join(" "))),
        other => other.clone(),
    })
}

pub fn id_preprocessing() -> PreprocessFn {
    Arc::new(|value| map_text(value, |s| s.trim().to_lowercase()))
}
