//! Data model: documents made of typed elements, the tokens derived from
//! them and the matches produced between them.

pub mod document;
pub mod element;
pub mod matchable;
pub mod matches;
pub mod token;
pub mod types;
pub mod value;

pub use document::{Document, DocumentBuilder};
pub use element::{Element, ElementBuilder};
pub use matchable::Matchable;
pub use matches::{Match, Score};
pub use token::Token;
pub use types::{ElementClassification, ElementType, MatchType};
pub use value::Value;
