//! Document matcher: element matches aggregated per candidate document
//!
//! Documents are processed in arrival order against one token index. The
//! element matches of a document are grouped by the document owning the
//! matched-with element, scored with the subject's scoring strategy, and
//! emitted when the score exceeds the subject's threshold. A mirrored match
//! follows unless the candidate is explicitly flagged as non-source.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use ahash::AHashMap;
use rayon::prelude::*;
use tracing::{debug, info, warn, Level};

use super::element_match::ElementMatcher;
use crate::config::MatchConfig;
use crate::domain::{Document, Match, Matchable, Score};
use crate::error::Result;
use crate::function::ScoreContext;

pub struct DocumentMatcher {
    config: MatchConfig,
    elements: ElementMatcher,
    /// Owners of the indexed elements, whose back-references are weak.
    indexed: Vec<Arc<Document>>,
}

impl Default for DocumentMatcher {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

/// Element matches against one candidate document.
struct CandidateGroup {
    candidate: Arc<Document>,
    scores: Vec<Score>,
}

impl DocumentMatcher {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            elements: ElementMatcher::new(config.clone()),
            config,
            indexed: Vec::new(),
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn element_matcher(&self) -> &ElementMatcher {
        &self.elements
    }

    /// Documents indexed so far, in arrival order.
    pub fn indexed(&self) -> &[Arc<Document>] {
        &self.indexed
    }

    /// Match one document against every document seen before it, then
    /// index it. The matcher keeps the document alive from then on.
    pub fn match_document(&mut self, document: &Arc<Document>) -> Result<Vec<Match<Document>>> {
        self.indexed.push(Arc::clone(document));
        let mut groups: Vec<CandidateGroup> = Vec::new();
        let mut positions: AHashMap<String, usize> = AHashMap::new();

        for element in document.preprocessed_elements() {
            for element_match in self.elements.match_element(element)? {
                let Some(candidate) = element_match.matched_with().document() else {
                    continue;
                };
                let position = *positions.entry(candidate.key().to_string()).or_insert_with(|| {
                    groups.push(CandidateGroup {
                        candidate: Arc::clone(&candidate),
                        scores: Vec::new(),
                    });
                    groups.len() - 1
                });
                // one copy per key; later copies of the same record are ignored
                if !Arc::ptr_eq(&groups[position].candidate, &candidate) {
                    continue;
                }
                groups[position].scores.push(element_match.score());
            }
        }

        let mut matches = Vec::new();
        for group in groups {
            let result = self.aggregate(document, &group.candidate, &group.scores);
            if result <= document.threshold() {
                continue;
            }
            debug!(
                subject = document.key(),
                candidate = group.candidate.key(),
                result,
                "document_matched"
            );
            let forward = Match::new(
                Arc::clone(document),
                Arc::clone(&group.candidate),
                Score::new(result, Matchable::weight(&**document)),
            )
            .with_child_scores(group.scores);
            let mirror = group.candidate.is_source() != Some(false);
            if mirror {
                let mirrored = forward.mirrored();
                matches.push(forward);
                matches.push(mirrored);
            } else {
                matches.push(forward);
            }
        }
        Ok(matches)
    }

    fn aggregate(&self, subject: &Document, candidate: &Document, scores: &[Score]) -> f64 {
        let child_count =
            (subject.child_count(candidate) + candidate.child_count(subject)) as f64 / 2.0;
        let unmatched_count = (subject.unmatched_child_count(candidate)
            + candidate.unmatched_child_count(subject)) as f64
            / 2.0;
        let ctx = ScoreContext::new(child_count, unmatched_count, &self.config);
        subject.scoring_strategy().combine(scores, &ctx)
    }

    /// Match a whole batch in order, returning every emitted match.
    pub fn match_documents(&mut self, documents: &[Arc<Document>]) -> Result<Vec<Match<Document>>> {
        let span = tracing::span!(
            Level::INFO,
            "fuzzymatch.match_documents",
            documents = documents.len()
        );
        let _guard = span.enter();
        let start = Instant::now();

        let outcome = self.warm_up(documents).and_then(|()| {
            let mut matches = Vec::new();
            for document in documents {
                matches.extend(self.match_document(document)?);
            }
            Ok(matches)
        });

        let elapsed_micros = start.elapsed().as_micros() as u64;
        match &outcome {
            Ok(matches) => info!(elapsed_micros, matches = matches.len(), "match_documents_success"),
            Err(error) => warn!(elapsed_micros, error = %error, "match_documents_failed"),
        }
        outcome
    }

    /// Compute preprocessed values and tokens ahead of the sequential pass,
    /// in parallel for large batches.
    fn warm_up(&self, documents: &[Arc<Document>]) -> Result<()> {
        if documents.len() >= self.config.parallel_threshold {
            documents.par_iter().try_for_each(|d| d.warm_up())
        } else {
            documents.iter().try_for_each(|d| d.warm_up())
        }
    }

    /// Lazily match `documents`, pulling one document per step.
    pub fn into_stream<I>(self, documents: I) -> MatchStream<I::IntoIter>
    where
        I: IntoIterator<Item = Arc<Document>>,
    {
        MatchStream {
            matcher: self,
            documents: documents.into_iter(),
            pending: VecDeque::new(),
            failed: false,
        }
    }
}

/// Lazy sequence of document matches. Yields at most one error, after which
/// it is exhausted.
pub struct MatchStream<I> {
    matcher: DocumentMatcher,
    documents: I,
    pending: VecDeque<Match<Document>>,
    failed: bool,
}

impl<I> Iterator for MatchStream<I>
where
    I: Iterator<Item = Arc<Document>>,
{
    type Item = Result<Match<Document>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(found) = self.pending.pop_front() {
                return Some(Ok(found));
            }
            if self.failed {
                return None;
            }
            let document = self.documents.next()?;
            match self.matcher.match_document(&document) {
                Ok(matches) => self.pending.extend(matches),
                Err(error) => {
                    warn!(document = document.key(), error = %error, "match_stream_failed");
                    self.failed = true;
                    return Some(Err(error));
                }
            }
        }
    }
}

/// Match `documents` with a fresh index.
pub fn match_documents(
    documents: &[Arc<Document>],
    config: &MatchConfig,
) -> Result<Vec<Match<Document>>> {
    DocumentMatcher::new(config.clone()).match_documents(documents)
}
