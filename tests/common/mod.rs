#![allow(dead_code)]

use std::sync::Arc;

use fuzzymatch::{Document, DocumentBuilder, Element, ElementBuilder, ElementType, Value};

pub fn field(element_type: ElementType, value: impl Into<Value>) -> Element {
    ElementBuilder::new()
        .with_type(element_type)
        .with_value(value)
        .build()
        .expect("element should build")
}

/// Phone or email element as the contact fixtures declare them.
pub fn contact(element_type: ElementType, value: &str, weight: f64) -> Element {
    ElementBuilder::new()
        .with_type(element_type)
        .with_value(value)
        .with_weight(weight)
        .with_threshold(0.5)
        .build()
        .expect("contact element should build")
}

pub fn document(key: &str, elements: Vec<Element>) -> Arc<Document> {
    DocumentBuilder::new(key)
        .with_elements(elements)
        .build()
        .expect("document should build")
}

/// Name, address, phone (weight 2) and email with contact thresholds.
pub fn person(key: &str, name: &str, address: &str, phone: &str, email: &str) -> Arc<Document> {
    document(
        key,
        vec![
            field(ElementType::Name, name),
            field(ElementType::Address, address),
            contact(ElementType::Phone, phone, 2.0),
            contact(ElementType::Email, email, 1.0),
        ],
    )
}

/// One single-element document per value, keyed "1", "2", ...
pub fn numbered<V: Into<Value>>(
    values: impl IntoIterator<Item = V>,
    element_type: ElementType,
    range: Option<f64>,
) -> Vec<Arc<Document>> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let mut builder = ElementBuilder::new().with_type(element_type).with_value(value);
            if let Some(range) = range {
                builder = builder.with_neighborhood_range(range);
            }
            document(
                &(i + 1).to_string(),
                vec![builder.build().expect("element should build")],
            )
        })
        .collect()
}
