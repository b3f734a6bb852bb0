//! Element matcher: token lookups accumulated into element-level matches
//!
//! For each token of the probing element the index returns candidate
//! elements. Every hit raises that candidate's running token count, and the
//! running score `count / max(distinct tokens)` is recorded as soon as it
//! exceeds the element's threshold, replacing any earlier score for the
//! same pair. The element's tokens are indexed only after all lookups.

use std::sync::Arc;

use ahash::AHashMap;
use tracing::trace;

use crate::config::MatchConfig;
use crate::domain::{Element, Match, Matchable, Score, Token};
use crate::error::Result;
use crate::function::scoring::token_ratio;
use crate::indexing::TokenIndex;

/// Running state for one candidate of the element being matched.
#[derive(Default)]
struct Tally {
    matched_tokens: usize,
    position: Option<usize>,
}

pub struct ElementMatcher {
    index: TokenIndex,
}

impl Default for ElementMatcher {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

impl ElementMatcher {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            index: TokenIndex::new(config),
        }
    }

    pub fn index(&self) -> &TokenIndex {
        &self.index
    }

    /// Match `element` against everything indexed so far, then index it.
    ///
    /// Candidates from the element's own document are skipped. Non-source
    /// elements are indexed without probing.
    pub fn match_element(&mut self, element: &Arc<Element>) -> Result<Vec<Match<Element>>> {
        let tokens = Token::of(element)?;
        let mut matches: Vec<Match<Element>> = Vec::new();

        if element.can_probe() {
            let mut tallies: AHashMap<*const Element, Tally> = AHashMap::new();
            for token in &tokens {
                for candidate in self.index.get(token)? {
                    if candidate.shares_document(element) {
                        continue;
                    }
                    let tally = tallies.entry(Arc::as_ptr(&candidate)).or_default();
                    tally.matched_tokens += 1;

                    let result = token_ratio(tally.matched_tokens, element.child_count(&candidate));
                    if result <= element.threshold() {
                        continue;
                    }
                    let score = Score::new(result, element.weight());
                    match tally.position {
                        Some(position) => matches[position].set_score(score),
                        None => {
                            tally.position = Some(matches.len());
                            matches.push(Match::new(Arc::clone(element), candidate, score));
                        }
                    }
                }
            }
            trace!(
                element = %element,
                tokens = tokens.len(),
                candidates = tallies.len(),
                matches = matches.len(),
                "element_probed"
            );
        }

        for token in &tokens {
            self.index.put(token)?;
        }
        Ok(matches)
    }
}
