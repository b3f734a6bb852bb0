//! Batch entry points built on the document matcher
//!
//! Each call owns a fresh token index, so results never depend on earlier
//! calls.

use std::sync::Arc;

use ahash::AHashMap;
use tracing::info;

use crate::config::MatchConfig;
use crate::dedup::{group_matches, DuplicateGroup};
use crate::domain::{Document, Match};
use crate::error::Result;
use crate::matching::DocumentMatcher;

/// Matches grouped by subject document key, in first-seen order.
#[derive(Debug, Default)]
pub struct MatchesByKey {
    entries: Vec<(String, Vec<Match<Document>>)>,
    positions: AHashMap<String, usize>,
}

impl MatchesByKey {
    fn push(&mut self, found: Match<Document>) {
        let key = found.data().key();
        let position = match self.positions.get(key) {
            Some(&position) => position,
            None => {
                self.positions.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), Vec::new()));
                self.entries.len() - 1
            }
        };
        self.entries[position].1.push(found);
    }

    pub fn get(&self, key: &str) -> Option<&[Match<Document>]> {
        self.positions
            .get(key)
            .map(|&position| self.entries[position].1.as_slice())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Match<Document>])> {
        self.entries
            .iter()
            .map(|(key, matches)| (key.as_str(), matches.as_slice()))
    }

    /// Number of subject keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every match, in emission order per key.
    pub fn matches(&self) -> impl Iterator<Item = &Match<Document>> {
        self.entries.iter().flat_map(|(_, matches)| matches.iter())
    }
}

impl FromIterator<Match<Document>> for MatchesByKey {
    fn from_iter<I: IntoIterator<Item = Match<Document>>>(iter: I) -> Self {
        let mut grouped = MatchesByKey::default();
        for found in iter {
            grouped.push(found);
        }
        grouped
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchService {
    config: MatchConfig,
}

impl MatchService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config` after checking it.
    pub fn with_config(config: MatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Every match among `documents`.
    pub fn match_all(&self, documents: &[Arc<Document>]) -> Result<Vec<Match<Document>>> {
        DocumentMatcher::new(self.config.clone()).match_documents(documents)
    }

    /// Matches among `documents`, grouped by subject key.
    pub fn apply_match(&self, documents: &[Arc<Document>]) -> Result<MatchesByKey> {
        Ok(self.match_all(documents)?.into_iter().collect())
    }

    /// Matches of `documents` against a read-only `reference` list.
    ///
    /// Reference documents are flagged non-source and indexed first, so
    /// they appear only as the matched-with side. Documents of the probe
    /// list are flagged as sources and also match each other.
    pub fn apply_match_against(
        &self,
        documents: &[Arc<Document>],
        reference: &[Arc<Document>],
    ) -> Result<MatchesByKey> {
        let batch: Vec<Arc<Document>> = reference
            .iter()
            .map(|d| d.with_source(false))
            .chain(documents.iter().map(|d| d.with_source(true)))
            .collect();
        info!(
            documents = documents.len(),
            reference = reference.len(),
            "apply_match_against"
        );
        self.apply_match(&batch)
    }

    /// Transitive groups of matching documents, largest first.
    pub fn apply_match_by_groups(&self, documents: &[Arc<Document>]) -> Result<Vec<DuplicateGroup>> {
        Ok(group_matches(self.match_all(documents)?))
    }
}
