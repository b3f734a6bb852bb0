//! Token index: one repository per element classification
//!
//! Each repository implements one lookup strategy:
//! - Equality: exact token value
//! - EqualityDistance: every stored token within the Levenshtein bound
//! - NearestNeighbors: ordinal tokens inside a percentage range of the probe
//!
//! Repositories are created on first insert. A lookup never sees the
//! probing element's own tokens, since the matcher inserts only after it
//! has looked up all of them.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use tracing::trace;

use crate::algorithms::levenshtein::Levenshtein;
use crate::config::MatchConfig;
use crate::domain::{Element, ElementClassification, ElementType, MatchType, Token, Value};
use crate::error::{MatchError, Result};

/// Collects owners from several buckets, keeping first-seen order and
/// dropping repeats.
#[derive(Default)]
struct OwnerUnion {
    seen: AHashSet<*const Element>,
    owners: Vec<Arc<Element>>,
}

impl OwnerUnion {
    fn extend<'a>(&mut self, bucket: impl IntoIterator<Item = &'a Arc<Element>>) {
        for owner in bucket {
            if self.seen.insert(Arc::as_ptr(owner)) {
                self.owners.push(Arc::clone(owner));
            }
        }
    }
}

/// Exact-key repository.
#[derive(Debug, Default)]
pub struct EqualityRepo {
    owners: AHashMap<Value, Vec<Arc<Element>>>,
}

impl EqualityRepo {
    fn put(&mut self, value: &Value, element: &Arc<Element>) {
        self.owners
            .entry(value.clone())
            .or_default()
            .push(Arc::clone(element));
    }

    fn get(&self, value: &Value, union: &mut OwnerUnion) {
        if let Some(bucket) = self.owners.get(value) {
            union.extend(bucket);
        }
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// Edit-distance repository. Keys are kept in insertion order so scans are
/// deterministic.
#[derive(Debug)]
pub struct EditDistanceRepo {
    metric: Levenshtein,
    keys: Vec<String>,
    positions: AHashMap<String, usize>,
    owners: Vec<Vec<Arc<Element>>>,
}

impl EditDistanceRepo {
    fn new(max_distance: usize) -> Self {
        Self {
            metric: Levenshtein::with_max_distance(max_distance),
            keys: Vec::new(),
            positions: AHashMap::new(),
            owners: Vec::new(),
        }
    }

    fn key_of(value: &Value) -> String {
        match value {
            Value::Text(s) => s.clone(),
            other => other.to_string(),
        }
    }

    fn put(&mut self, value: &Value, element: &Arc<Element>) {
        let key = Self::key_of(value);
        let position = match self.positions.get(&key) {
            Some(&position) => position,
            None => {
                let position = self.keys.len();
                self.positions.insert(key.clone(), position);
                self.keys.push(key);
                self.owners.push(Vec::new());
                position
            }
        };
        self.owners[position].push(Arc::clone(element));
    }

    fn get(&self, value: &Value, union: &mut OwnerUnion) {
        let probe = Self::key_of(value);
        for (key, bucket) in self.keys.iter().zip(&self.owners) {
            if self.metric.is_within(&probe, key) {
                union.extend(bucket);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Totally ordered key for range queries. Numbers and instants never
/// compare inside one range because bounds share the probe's variant.
#[derive(Debug, Clone, Copy)]
enum RangeKey {
    Number(f64),
    Instant(i64),
}

impl RangeKey {
    fn of(value: &Value) -> Result<Self> {
        match value {
            Value::Date(d) => Ok(RangeKey::Instant(d.timestamp_millis())),
            other => other
                .as_f64()
                .map(RangeKey::Number)
                .ok_or_else(|| MatchError::unsupported("nearest neighbors", other.kind())),
        }
    }
}

impl Ord for RangeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (RangeKey::Number(a), RangeKey::Number(b)) => a.total_cmp(b),
            (RangeKey::Instant(a), RangeKey::Instant(b)) => a.cmp(b),
            (RangeKey::Number(_), RangeKey::Instant(_)) => Ordering::Less,
            (RangeKey::Instant(_), RangeKey::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for RangeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RangeKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RangeKey {}

/// Inclusive bounds `value ± |base × (1 − range)|`, cast back to the
/// probe's own kind. Integers truncate toward zero.
fn neighborhood(
    value: &Value,
    element_type: ElementType,
    range: f64,
    config: &MatchConfig,
) -> Result<(RangeKey, RangeKey)> {
    let Some(magnitude) = value.as_f64() else {
        return Err(MatchError::unsupported("nearest neighbors", value.kind()));
    };
    let base = match element_type {
        ElementType::Age => config.age_range_base,
        ElementType::Date => config.date_range_base_millis,
        _ => magnitude,
    };
    let delta = (base * (1.0 - range)).abs();
    let (lower, upper) = (magnitude - delta, magnitude + delta);

    Ok(match value {
        Value::Int(_) | Value::Long(_) => (
            RangeKey::Number(lower.trunc()),
            RangeKey::Number(upper.trunc()),
        ),
        Value::Float(_) => (
            RangeKey::Number(f64::from(lower as f32)),
            RangeKey::Number(f64::from(upper as f32)),
        ),
        Value::Date(_) => (
            RangeKey::Instant(lower as i64),
            RangeKey::Instant(upper as i64),
        ),
        _ => (RangeKey::Number(lower), RangeKey::Number(upper)),
    })
}

/// Ordered repository for numeric and date tokens.
#[derive(Debug, Default)]
pub struct NearestNeighborRepo {
    owners: BTreeMap<RangeKey, Vec<Arc<Element>>>,
}

impl NearestNeighborRepo {
    fn put(&mut self, value: &Value, element: &Arc<Element>) -> Result<()> {
        let key = RangeKey::of(value)?;
        self.owners.entry(key).or_default().push(Arc::clone(element));
        Ok(())
    }

    fn get(
        &self,
        value: &Value,
        element: &Element,
        config: &MatchConfig,
        union: &mut OwnerUnion,
    ) -> Result<()> {
        let range = element
            .neighborhood_range()
            .unwrap_or(config.neighborhood_range);
        let (lower, upper) = neighborhood(value, element.element_type(), range, config)?;
        if lower > upper {
            return Ok(());
        }
        for bucket in self.owners.range(lower..=upper).map(|(_, bucket)| bucket) {
            union.extend(bucket);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// A repository for one classification.
#[derive(Debug)]
pub enum TokenRepo {
    Equality(EqualityRepo),
    EqualityDistance(EditDistanceRepo),
    NearestNeighbors(NearestNeighborRepo),
}

impl TokenRepo {
    fn for_match_type(match_type: MatchType, config: &MatchConfig) -> Self {
        match match_type {
            MatchType::Equality => TokenRepo::Equality(EqualityRepo::default()),
            MatchType::EqualityDistance => {
                TokenRepo::EqualityDistance(EditDistanceRepo::new(config.max_edit_distance))
            }
            MatchType::NearestNeighbors => {
                TokenRepo::NearestNeighbors(NearestNeighborRepo::default())
            }
        }
    }

    /// Number of distinct keys stored.
    pub fn len(&self) -> usize {
        match self {
            TokenRepo::Equality(repo) => repo.len(),
            TokenRepo::EqualityDistance(repo) => repo.len(),
            TokenRepo::NearestNeighbors(repo) => repo.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registry of repositories, owned by a single matching run.
#[derive(Debug)]
pub struct TokenIndex {
    config: MatchConfig,
    repos: AHashMap<ElementClassification, TokenRepo>,
}

impl Default for TokenIndex {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

impl TokenIndex {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            repos: AHashMap::new(),
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Register `token` under its element's classification.
    pub fn put(&mut self, token: &Token<'_>) -> Result<()> {
        let classification = token.classification();
        if !self.repos.contains_key(classification) {
            trace!(
                element_type = classification.element_type.name(),
                match_type = ?classification.match_type,
                "token_repo_created"
            );
        }
        let config = &self.config;
        let repo = self
            .repos
            .entry(classification.clone())
            .or_insert_with(|| TokenRepo::for_match_type(classification.match_type, config));

        match repo {
            TokenRepo::Equality(repo) => repo.put(token.value, token.element),
            TokenRepo::EqualityDistance(repo) => repo.put(token.value, token.element),
            TokenRepo::NearestNeighbors(repo) => repo.put(token.value, token.element)?,
        }
        Ok(())
    }

    /// Elements owning a token that matches `token` under its strategy,
    /// in first-seen order without repeats.
    pub fn get(&self, token: &Token<'_>) -> Result<Vec<Arc<Element>>> {
        let classification = token.classification();
        if classification.match_type == MatchType::NearestNeighbors && !token.value.is_ordinal() {
            return Err(MatchError::unsupported("nearest neighbors", token.value.kind()));
        }

        let mut union = OwnerUnion::default();
        match self.repos.get(classification) {
            None => {}
            Some(TokenRepo::Equality(repo)) => repo.get(token.value, &mut union),
            Some(TokenRepo::EqualityDistance(repo)) => repo.get(token.value, &mut union),
            Some(TokenRepo::NearestNeighbors(repo)) => {
                repo.get(token.value, token.element, &self.config, &mut union)?
            }
        }
        Ok(union.owners)
    }

    pub fn repo(&self, classification: &ElementClassification) -> Option<&TokenRepo> {
        self.repos.get(classification)
    }

    /// Number of classifications seen so far.
    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }
}
