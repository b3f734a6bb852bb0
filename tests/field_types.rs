mod common;

use chrono::{TimeZone, Utc};
use fuzzymatch::function::{preprocess, tokenizer};
use fuzzymatch::{
    DocumentBuilder, ElementBuilder, ElementType, MatchError, MatchService, MatchType, Value,
};

use common::{document, numbered};

fn apply(docs: &[std::sync::Arc<fuzzymatch::Document>]) -> fuzzymatch::MatchesByKey {
    MatchService::new().apply_match(docs).expect("matching should succeed")
}

fn value_of(doc: &fuzzymatch::Document) -> i32 {
    match doc.elements()[0].value() {
        Value::Int(v) => *v,
        other => panic!("expected an integer, got {other:?}"),
    }
}

#[test]
fn integers_match_within_ten_percent() {
    let numbers = [91, 100, 200, 152, 11, 15, 10, 200];
    let result = apply(&numbered(numbers, ElementType::Number, None));
    assert_eq!(result.len(), 6);
    for found in result.matches() {
        let (a, b) = (value_of(found.data()), value_of(found.matched_with()));
        let (small, big) = (a.min(b), a.max(b));
        assert!(f64::from(small) >= 0.9 * f64::from(big));
    }

    let tight = apply(&numbered(numbers, ElementType::Number, Some(0.99)));
    assert_eq!(tight.len(), 2);
}

#[test]
fn doubles_match_within_ten_percent() {
    let numbers = [23.0, 22.0, 10.0, 5.0, 9.0, 11.0, 10.5, 23.2];
    assert_eq!(apply(&numbered(numbers, ElementType::Number, None)).len(), 6);
    assert_eq!(apply(&numbered(numbers, ElementType::Number, Some(0.99))).len(), 2);
}

#[test]
fn ages_use_a_fixed_tolerance() {
    let ages = [1, 2, 9, 10, 11, 45, 49, 50, 52, 55, 90, 95, 100, 107, 115];

    let result = apply(&numbered(ages, ElementType::Age, None));
    assert_eq!(result.len(), 7);
    for found in result.matches() {
        assert!((value_of(found.data()) - value_of(found.matched_with())).abs() <= 1);
    }

    let wide = apply(&numbered(ages, ElementType::Age, Some(0.7)));
    assert_eq!(wide.len(), 9);
    for found in wide.matches() {
        assert!((value_of(found.data()) - value_of(found.matched_with())).abs() <= 3);
    }
}

#[test]
fn dates_match_within_months() {
    let day = |y, m, d| Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap();

    let dates = [day(2020, 1, 1), day(2020, 12, 1), day(2020, 2, 1)];
    assert_eq!(apply(&numbered(dates, ElementType::Date, None)).len(), 2);

    // 0.99 is roughly 18 days either side
    let dates = [day(2020, 1, 1), day(2020, 1, 2), day(2019, 2, 1)];
    assert_eq!(apply(&numbered(dates, ElementType::Date, Some(0.99))).len(), 2);
}

#[test]
fn nearest_neighbors_reject_text() {
    let built = ElementBuilder::new()
        .with_type(ElementType::Name)
        .with_value("James")
        .with_match_type(MatchType::NearestNeighbors)
        .build();
    assert!(matches!(built, Err(MatchError::UnsupportedType { .. })));
}

#[test]
fn ngram_tokenizer_rejects_numbers() {
    let docs = vec![document(
        "1",
        vec![ElementBuilder::new()
            .with_type(ElementType::Number)
            .with_value(42)
            .with_tokenizer(tokenizer::tri_gram_tokenizer())
            .build()
            .expect("element should build")],
    )];
    let error = MatchService::new().apply_match(&docs).unwrap_err();
    assert!(matches!(
        error,
        MatchError::UnsupportedType { operation: "n-gram tokenizer", kind: "integer" }
    ));
}

fn id_doc(key: &str, element_type: ElementType, value: &str) -> std::sync::Arc<fuzzymatch::Document> {
    document(
        key,
        vec![ElementBuilder::new()
            .with_type(element_type)
            .with_value(value)
            .with_match_type(MatchType::EqualityDistance)
            .build()
            .expect("element should build")],
    )
}

#[test]
fn identifiers_tolerate_single_edits() {
    let exact = apply(&[
        id_doc("doc1", ElementType::Id, "1234SDF13212356"),
        id_doc("doc2", ElementType::Id, "1234SDF13212356"),
    ]);
    assert_eq!(exact.len(), 2);
    assert!((exact.get("doc1").expect("doc1")[0].result() - 1.0).abs() < f64::EPSILON);

    let partial = apply(&[
        id_doc("doc1", ElementType::Id, "1234SDF13212356"),
        id_doc("doc2", ElementType::Id, "121234SDF13212356ASD3457"),
    ]);
    let found = &partial.get("doc1").expect("doc1")[0];
    assert_eq!(found.matched_with().key(), "doc2");
    assert!((found.result() - 0.65).abs() < 0.001);

    let none = apply(&[
        id_doc("doc1", ElementType::Id, "123456"),
        id_doc("doc2", ElementType::Id, "abcdef"),
    ]);
    assert!(none.is_empty());
}

#[test]
fn prices_match_on_digit_width_ngrams() {
    let same = apply(&[
        id_doc("doc1", ElementType::Price, "100 BOL"),
        id_doc("doc2", ElementType::Price, "100 BOL"),
    ]);
    assert!((same.get("doc1").expect("doc1")[0].result() - 1.0).abs() < f64::EPSILON);

    let close = apply(&[
        id_doc("doc1", ElementType::Price, "500 USD"),
        id_doc("doc2", ElementType::Price, "500 JPN"),
    ]);
    assert_eq!(close.len(), 2);
    assert!((close.get("doc1").expect("doc1")[0].result() - 0.6).abs() < 0.001);

    let apart = apply(&[
        id_doc("doc1", ElementType::Price, "890 JPN"),
        id_doc("doc2", ElementType::Price, "132 BOL"),
    ]);
    assert!(apart.is_empty());
}

fn name_doc(key: &str, builder: ElementBuilder) -> std::sync::Arc<fuzzymatch::Document> {
    document(key, vec![builder.build().expect("element should build")])
}

fn name(value: &str) -> ElementBuilder {
    ElementBuilder::new().with_type(ElementType::Name).with_value(value)
}

#[test]
fn tokenizer_can_be_overridden() {
    let soundex = apply(&[name_doc("1", name("Brian Wilson")), name_doc("2", name("Bryan Wilkson"))]);
    assert_eq!(soundex.len(), 2);

    let words = apply(&[
        name_doc("1", name("Brian Wilson").with_tokenizer(tokenizer::word_tokenizer())),
        name_doc("2", name("Bryan Wilkson").with_tokenizer(tokenizer::word_tokenizer())),
    ]);
    assert!(words.is_empty());
}

#[test]
fn chained_tokenizers_need_every_token() {
    let chained = || {
        tokenizer::chain_tokenizers(vec![
            tokenizer::word_tokenizer(),
            tokenizer::word_soundex_tokenizer(),
            tokenizer::tri_gram_tokenizer(),
        ])
    };
    let text = |value: &str| {
        ElementBuilder::new()
            .with_type(ElementType::Text)
            .with_value(value)
            .with_tokenizer(chained())
    };
    let result = apply(&[name_doc("1", text("bold")), name_doc("2", text("bolt"))]);
    assert!(result.is_empty());
}

#[test]
fn preprocessing_can_be_overridden() {
    let dictionary: preprocess::Dictionary = [("Queen", ""), ("Third", ""), ("III", "")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let docs = [
        name_doc(
            "1",
            name("Victoria Third").with_preprocessing(preprocess::dictionary_replace(dictionary.clone())),
        ),
        name_doc(
            "2",
            name("Queen Victoria III").with_preprocessing(preprocess::dictionary_replace(dictionary)),
        ),
    ];
    assert_eq!(apply(&docs).len(), 2);
}

#[test]
fn variance_separates_otherwise_equal_fields() {
    let same = apply(&[
        name_doc("1", name("Tom Kelly").with_variance("self")),
        name_doc("2", name("tom kelly").with_variance("self")),
    ]);
    assert_eq!(same.len(), 2);

    let different = apply(&[
        name_doc("1", name("Tom Kelly").with_variance("self")),
        name_doc("2", name("tom kelly").with_variance("spouse")),
    ]);
    assert!(different.is_empty());
}

#[test]
fn fields_of_different_types_never_match() {
    let docs = vec![
        DocumentBuilder::new("1")
            .with_element(name("James Parker").build().expect("element should build"))
            .build()
            .expect("document should build"),
        DocumentBuilder::new("2")
            .with_element(
                ElementBuilder::new()
                    .with_type(ElementType::Text)
                    .with_value("James Parker")
                    .build()
                    .expect("element should build"),
            )
            .build()
            .expect("document should build"),
    ];
    assert!(apply(&docs).is_empty());
}
