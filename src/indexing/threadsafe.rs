//! Thread-safe wrapper for the token index.
//!
//! A matching run owns its index exclusively, so the matchers use
//! [`TokenIndex`] directly. This wrapper is for callers that index elements
//! from several threads and probe the same index concurrently.
//!
//! # Performance Notes
//!
//! - Lookups acquire a shared read lock
//! - Inserts acquire an exclusive write lock
//! - An element's tokens are inserted under one lock acquisition

use parking_lot::RwLock;
use std::sync::Arc;

use super::token_index::TokenIndex;
use crate::config::MatchConfig;
use crate::domain::{Element, Token};
use crate::error::Result;

/// Thread-safe wrapper for TokenIndex.
///
/// Cloning is cheap and every clone refers to the same index.
#[derive(Clone, Default)]
pub struct ThreadSafeTokenIndex {
    inner: Arc<RwLock<TokenIndex>>,
}

impl ThreadSafeTokenIndex {
    pub fn new(config: MatchConfig) -> Self {
        Self::from_index(TokenIndex::new(config))
    }

    /// Wrap an existing index.
    pub fn from_index(index: TokenIndex) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    /// Register one token.
    ///
    /// Acquires an exclusive write lock.
    pub fn put(&self, token: &Token<'_>) -> Result<()> {
        self.inner.write().put(token)
    }

    /// Register every token of `element`.
    ///
    /// Tokenizes before taking the lock, then acquires it once.
    pub fn put_element(&self, element: &Arc<Element>) -> Result<()> {
        let tokens = Token::of(element)?;
        let mut index = self.inner.write();
        for token in &tokens {
            index.put(token)?;
        }
        Ok(())
    }

    /// Owners of tokens matching `token`.
    ///
    /// Acquires a shared read lock.
    pub fn get(&self, token: &Token<'_>) -> Result<Vec<Arc<Element>>> {
        self.inner.read().get(token)
    }

    /// Owners of any token of `element`, without repeats.
    ///
    /// Acquires a shared read lock.
    pub fn candidates(&self, element: &Arc<Element>) -> Result<Vec<Arc<Element>>> {
        let tokens = Token::of(element)?;
        let index = self.inner.read();
        let mut found: Vec<Arc<Element>> = Vec::new();
        for token in &tokens {
            for owner in index.get(token)? {
                if !found.iter().any(|e| Arc::ptr_eq(e, &owner)) {
                    found.push(owner);
                }
            }
        }
        Ok(found)
    }

    /// Number of classifications indexed.
    ///
    /// Acquires a shared read lock.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Unwrap the index if this is the last handle.
    pub fn try_into_inner(self) -> std::result::Result<TokenIndex, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Document, DocumentBuilder, ElementBuilder, ElementType};
    use std::thread;

    fn phone_doc(key: String, phone: &str) -> Arc<Document> {
        DocumentBuilder::new(key)
            .with_element(
                ElementBuilder::new()
                    .with_type(ElementType::Phone)
                    .with_value(phone)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_threadsafe_index_concurrent_writes() {
        let index = ThreadSafeTokenIndex::default();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let index = index.clone();
                thread::spawn(move || {
                    let docs: Vec<_> = (0..25)
                        .map(|j| phone_doc(format!("{i}-{j}"), &format!("(555) 01{i}-{j:04}")))
                        .collect();
                    for d in &docs {
                        index.put_element(&d.elements()[0]).unwrap();
                    }
                    docs
                })
            })
            .collect();

        let docs: Vec<Arc<Document>> = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();
        assert_eq!(docs.len(), 100);
        assert_eq!(index.len(), 1);

        let probe = phone_doc("probe".into(), "555-012-0007");
        let found = index.candidates(&probe.elements()[0]).unwrap();
        let keys: Vec<String> = found
            .iter()
            .map(|e| e.document().unwrap().key().to_string())
            .collect();
        // the leading deca-gram is shared by 2-0 ..= 2-9
        assert_eq!(keys.len(), 10);
        assert_eq!(keys.iter().filter(|k| k.as_str() == "2-7").count(), 1);
    }

    #[test]
    fn test_threadsafe_index_concurrent_reads() {
        let index = ThreadSafeTokenIndex::new(MatchConfig::default());
        let target = phone_doc("1".into(), "(123) 234 2345");
        index.put_element(&target.elements()[0]).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let index = index.clone();
                thread::spawn(move || {
                    let probe = phone_doc(format!("p{i}"), "123-234-2345");
                    let found = index.candidates(&probe.elements()[0]).unwrap();
                    assert_eq!(found.len(), 1);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(index.try_into_inner().is_ok());
    }
}
