//! Adjacency index over concept relations

use super::model::{ConceptId, ConceptRelation, RelationId};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

/// Which end of a relation to follow from an origin concept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Origin is the source; the neighbor is the target
    Outgoing,
    /// Origin is the target; the neighbor is the source
    Incoming,
}

impl Direction {
    /// The endpoint of `relation` reached by following it in this direction
    pub fn neighbor(self, relation: &ConceptRelation) -> ConceptId {
        match self {
            Direction::Outgoing => relation.to,
            Direction::Incoming => relation.from,
        }
    }
}

/// Forward and backward adjacency maps keyed by concept ID
///
/// A relation row added more than once (e.g. returned by both an outgoing
/// and an incoming query) is indexed once.
#[derive(Debug, Default)]
pub struct RelationIndex {
    outgoing: HashMap<ConceptId, Vec<ConceptRelation>>,
    incoming: HashMap<ConceptId, Vec<ConceptRelation>>,
    seen: HashSet<RelationId>,
}

impl RelationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(relations: impl IntoIterator<Item = ConceptRelation>) -> Self {
        let mut index = Self::new();
        for relation in relations {
            index.insert(relation);
        }
        index
    }

    /// Index a relation. Returns false if its ID was already indexed.
    pub fn insert(&mut self, relation: ConceptRelation) -> bool {
        if !self.seen.insert(relation.id) {
            return false;
        }
        self.incoming
            .entry(relation.to)
            .or_default()
            .push(relation.clone());
        self.outgoing.entry(relation.from).or_default().push(relation);
        true
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn relations(&self, id: ConceptId, direction: Direction) -> &[ConceptRelation] {
        let map = match direction {
            Direction::Outgoing => &self.outgoing,
            Direction::Incoming => &self.incoming,
        };
        map.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every relation leaving (or entering) any of `origins`, strongest first.
    ///
    /// Ties break on the neighbor's concept ID, then the relation ID, both
    /// ascending, so the order never depends on storage iteration order.
    pub fn ranked(&self, origins: &[ConceptId], direction: Direction) -> Vec<&ConceptRelation> {
        let mut ranked: Vec<&ConceptRelation> = origins
            .iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .flat_map(|id| self.relations(*id, direction))
            .collect();
        ranked.sort_by_key(|r| (Reverse(r.strength), direction.neighbor(r), r.id));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(id: i64, from: i64, to: i64, strength: u8) -> ConceptRelation {
        ConceptRelation {
            id: RelationId::new(id),
            from: ConceptId::new(from),
            to: ConceptId::new(to),
            relation_type: None,
            strength,
        }
    }

    fn ids(relations: &[&ConceptRelation]) -> Vec<i64> {
        relations.iter().map(|r| r.id.get()).collect()
    }

    #[test]
    fn test_duplicate_rows_indexed_once() {
        let mut index = RelationIndex::new();
        assert!(index.insert(rel(1, 10, 20, 5)));
        assert!(!index.insert(rel(1, 10, 20, 5)));
        assert_eq!(index.len(), 1);
        assert_eq!(index.relations(ConceptId::new(10), Direction::Outgoing).len(), 1);
        assert_eq!(index.relations(ConceptId::new(20), Direction::Incoming).len(), 1);
    }

    #[test]
    fn test_missing_concept_has_no_relations() {
        let index = RelationIndex::build(vec![rel(1, 10, 20, 5)]);
        assert!(index.relations(ConceptId::new(99), Direction::Outgoing).is_empty());
    }

    #[test]
    fn test_ranked_orders_by_strength_then_neighbor_then_id() {
        let index = RelationIndex::build(vec![
            rel(1, 1, 30, 4),
            rel(2, 1, 20, 7),
            rel(3, 2, 10, 4),
            rel(4, 2, 10, 4),
            rel(5, 1, 40, 9),
        ]);

        let ranked = index.ranked(&[ConceptId::new(1), ConceptId::new(2)], Direction::Outgoing);
        assert_eq!(ids(&ranked), vec![5, 2, 3, 4, 1]);
    }

    #[test]
    fn test_ranked_incoming_uses_source_as_neighbor() {
        let index = RelationIndex::build(vec![rel(1, 50, 1, 3), rel(2, 40, 1, 3)]);
        let ranked = index.ranked(&[ConceptId::new(1)], Direction::Incoming);
        assert_eq!(ids(&ranked), vec![2, 1]);
    }

    #[test]
    fn test_ranked_ignores_repeated_origins() {
        let index = RelationIndex::build(vec![rel(1, 1, 2, 3)]);
        let ranked = index.ranked(&[ConceptId::new(1), ConceptId::new(1)], Direction::Outgoing);
        assert_eq!(ranked.len(), 1);
    }
}
