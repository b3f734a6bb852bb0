//! Grouping of pairwise document matches into duplicate groups
//!
//! Matches are treated as edges between documents; connected documents form
//! one group, found with a union-find over document keys.

use std::sync::Arc;

use ahash::AHashMap;

use crate::domain::{Document, Match};

/// Documents connected by matches, with the matches between them.
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    /// Documents in first-seen order
    pub documents: Vec<Arc<Document>>,
    /// Matches whose subject belongs to this group, in emission order
    pub matches: Vec<Match<Document>>,
}

impl DuplicateGroup {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.documents.iter().any(|d| d.key() == key)
    }
}

/// Union-Find data structure for efficient clustering
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]); // Path compression
        }
        self.parent[x]
    }

    fn union(&mut self, x: usize, y: usize) {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x != root_y {
            // Union by rank
            match self.rank[root_x].cmp(&self.rank[root_y]) {
                std::cmp::Ordering::Less => {
                    self.parent[root_x] = root_y;
                }
                std::cmp::Ordering::Greater => {
                    self.parent[root_y] = root_x;
                }
                std::cmp::Ordering::Equal => {
                    self.parent[root_y] = root_x;
                    self.rank[root_x] += 1;
                }
            }
        }
    }
}

/// Partition `matches` into transitive groups, largest first. Groups of
/// equal size keep the order in which their first document appeared.
pub fn group_matches(matches: Vec<Match<Document>>) -> Vec<DuplicateGroup> {
    let mut documents: Vec<Arc<Document>> = Vec::new();
    let mut ids: AHashMap<String, usize> = AHashMap::new();
    let mut id_of = |document: &Arc<Document>| -> usize {
        *ids.entry(document.key().to_string()).or_insert_with(|| {
            documents.push(Arc::clone(document));
            documents.len() - 1
        })
    };

    let edges: Vec<(usize, usize)> = matches
        .iter()
        .map(|m| (id_of(m.data()), id_of(m.matched_with())))
        .collect();

    let mut uf = UnionFind::new(documents.len());
    for &(a, b) in &edges {
        uf.union(a, b);
    }

    let mut slots: AHashMap<usize, usize> = AHashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();
    for (id, document) in documents.iter().enumerate() {
        let root = uf.find(id);
        let slot = *slots.entry(root).or_insert_with(|| {
            groups.push(DuplicateGroup {
                documents: Vec::new(),
                matches: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].documents.push(Arc::clone(document));
    }
    for (found, (subject, _)) in matches.into_iter().zip(edges) {
        let root = uf.find(subject);
        if let Some(&slot) = slots.get(&root) {
            groups[slot].matches.push(found);
        }
    }

    // Sort groups by size (largest first), stable for equal sizes
    groups.sort_by(|a, b| b.len().cmp(&a.len()));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentBuilder, ElementBuilder, ElementType, Score};

    fn doc(key: &str) -> Arc<Document> {
        DocumentBuilder::new(key)
            .with_element(
                ElementBuilder::new()
                    .with_type(ElementType::Name)
                    .with_value(key)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    fn pair(a: &Arc<Document>, b: &Arc<Document>) -> Match<Document> {
        Match::new(Arc::clone(a), Arc::clone(b), Score::new(0.9, 1.0))
    }

    #[test]
    fn test_group_matches_empty() {
        assert!(group_matches(Vec::new()).is_empty());
    }

    #[test]
    fn test_group_matches_transitive() {
        let (a, b, c, d, e) = (doc("a"), doc("b"), doc("c"), doc("d"), doc("e"));
        let matches = vec![
            pair(&d, &e),
            pair(&b, &a),
            pair(&a, &b),
            pair(&c, &b),
            pair(&e, &d),
        ];
        let groups = group_matches(matches);
        assert_eq!(groups.len(), 2);

        assert_eq!(groups[0].len(), 3);
        assert!(groups[0].contains("a") && groups[0].contains("b") && groups[0].contains("c"));
        assert_eq!(groups[0].matches.len(), 3);

        assert_eq!(groups[1].len(), 2);
        assert!(groups[1].contains("d") && groups[1].contains("e"));
        assert_eq!(groups[1].matches.len(), 2);
    }

    #[test]
    fn test_group_matches_keeps_first_seen_order_for_ties() {
        let (a, b, c, d) = (doc("a"), doc("b"), doc("c"), doc("d"));
        let groups = group_matches(vec![pair(&c, &d), pair(&a, &b)]);
        assert_eq!(groups[0].documents[0].key(), "c");
        assert_eq!(groups[1].documents[0].key(), "a");
    }

    #[test]
    fn test_union_find_chain() {
        let mut uf = UnionFind::new(5);
        uf.union(0, 1);
        uf.union(1, 2);
        uf.union(3, 4);
        assert_eq!(uf.find(0), uf.find(2));
        assert_ne!(uf.find(0), uf.find(3));
    }
}
