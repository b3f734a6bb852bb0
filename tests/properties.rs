mod common;

use std::sync::Arc;

use common::{document, field, person};
use fuzzymatch::{
    match_documents, Document, DocumentBuilder, DocumentMatcher, ElementType, MatchConfig,
    ThreadSafeTokenIndex,
};

fn contacts() -> Vec<Arc<Document>> {
    vec![
        person("1", "Steven Wilson", "45th Avenue 5th st.", "(214) 555-0101", "steven.wilson@gmail.com"),
        person("2", "John Doe", "546 freeman ave dallas tx 75024", "2122232235", "john@doe.com"),
        person("3", "Stephen Wilkson", "45th Ave 5th Street", "214-555-0101", "steve.wilson@gmail.com"),
        person("4", "Jon Doe", "546 freeman avenue dallas", "212-223-2235", "jon.doe@doe.com"),
        person("5", "Rupert Giles", "9 Library Lane", "5550001111", "rgiles@sunnydale.edu"),
    ]
}

fn scored_pairs(docs: &[Arc<Document>]) -> Vec<(String, String, f64)> {
    match_documents(docs, &MatchConfig::default())
        .expect("matching should succeed")
        .into_iter()
        .map(|m| (m.data().key().to_string(), m.matched_with().key().to_string(), m.result()))
        .collect()
}

#[test]
fn matching_is_deterministic() {
    let docs = contacts();
    assert_eq!(scored_pairs(&docs), scored_pairs(&docs));
    assert!(!scored_pairs(&docs).is_empty());
}

#[test]
fn documents_never_match_themselves() {
    for (subject, candidate, _) in scored_pairs(&contacts()) {
        assert_ne!(subject, candidate);
    }
}

#[test]
fn matches_are_symmetric_between_sources() {
    let pairs = scored_pairs(&contacts());
    for (subject, candidate, score) in &pairs {
        assert!(pairs
            .iter()
            .any(|(s, c, r)| s == candidate && c == subject && (r - score).abs() < f64::EPSILON));
    }
}

#[test]
fn raising_the_threshold_never_adds_matches() {
    let with_threshold = |threshold: f64| -> Vec<Arc<Document>> {
        contacts()
            .iter()
            .map(|d| {
                DocumentBuilder::new(d.key())
                    .with_threshold(threshold)
                    .with_elements(d.elements().iter().map(|e| e.as_ref().clone()))
                    .build()
                    .expect("document should build")
            })
            .collect()
    };
    let mut previous = usize::MAX;
    for threshold in [0.0, 0.3, 0.5, 0.7, 0.9] {
        let count = scored_pairs(&with_threshold(threshold)).len();
        assert!(count <= previous);
        previous = count;
    }
}

#[test]
fn scores_never_exceed_one_for_repeated_tokens() {
    let docs = vec![
        document("1", vec![field(ElementType::Address, "123 new Street new street")]),
        document("2", vec![field(ElementType::Address, "123 new Street")]),
    ];
    for (_, _, score) in scored_pairs(&docs) {
        assert!(score <= 1.0);
    }
}

#[test]
fn stream_and_batch_agree() {
    let docs = contacts();
    let batch = match_documents(&docs, &MatchConfig::default()).expect("batch should succeed");
    let streamed = DocumentMatcher::default()
        .into_stream(docs)
        .collect::<Result<Vec<_>, _>>()
        .expect("stream should succeed");
    assert_eq!(batch, streamed);
}

#[test]
fn stream_owning_its_documents_agrees_with_batch() {
    let batch = match_documents(&contacts(), &MatchConfig::default()).expect("batch should succeed");
    let streamed = DocumentMatcher::default()
        .into_stream(contacts().into_iter().map(|d| d.with_source(true)))
        .collect::<Result<Vec<_>, _>>()
        .expect("stream should succeed");
    assert!(!streamed.is_empty());
    assert_eq!(batch, streamed);
}

#[test]
fn copies_sharing_a_key_never_match_each_other() {
    let docs: Vec<Arc<Document>> = contacts()
        .iter()
        .flat_map(|d| [d.with_source(false), d.with_source(true)])
        .collect();
    let pairs = scored_pairs(&docs);
    assert!(!pairs.is_empty());
    for (subject, candidate, _) in pairs {
        assert_ne!(subject, candidate);
    }
}

#[test]
fn shared_index_serves_concurrent_readers() {
    let docs = contacts();
    let index = ThreadSafeTokenIndex::new(MatchConfig::default());
    for doc in &docs {
        for element in doc.preprocessed_elements() {
            index.put_element(element).expect("indexing should succeed");
        }
    }

    let probe = Arc::clone(&docs[2].preprocessed_elements()[0]);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let index = index.clone();
            let probe = Arc::clone(&probe);
            std::thread::spawn(move || index.candidates(&probe).expect("lookup should succeed").len())
        })
        .collect();
    let counts: Vec<usize> = handles
        .into_iter()
        .map(|h| h.join().expect("reader thread"))
        .collect();
    assert!(counts.iter().all(|&c| c == counts[0]));
    assert!(counts[0] >= 2);
}
