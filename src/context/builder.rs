//! Bounded one-hop context graph for an article
//!
//! Every concept the article mentions becomes a primary node. Relations of at
//! least `min_strength` touching a primary concept pull in their other
//! endpoint as a secondary node, until `max_secondary_nodes` secondaries
//! exist. After that an edge survives only if its other endpoint is already
//! in the graph.
//!
//! Relations are visited in two passes: first those leaving a primary
//! concept, then those entering one from a non-primary concept. Within a pass
//! the order is strength descending, then the candidate's concept ID
//! ascending, then the relation ID ascending.

use crate::config::GraphSettings;
use crate::graph::{
    ArticleId, Concept, ConceptId, ConceptRelation, Direction, Graph, GraphEdge, GraphNode,
    RelationIndex,
};
use crate::storage::{ConceptGraphStore, StorageResult};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Thresholds for a single build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildLimits {
    /// Relations weaker than this are ignored
    pub min_strength: u8,
    /// Most secondary nodes the graph may hold
    pub max_secondary_nodes: usize,
}

impl BuildLimits {
    pub fn new(min_strength: u8, max_secondary_nodes: usize) -> Self {
        Self {
            min_strength,
            max_secondary_nodes,
        }
    }
}

impl Default for BuildLimits {
    fn default() -> Self {
        Self::new(3, 15)
    }
}

impl From<&GraphSettings> for BuildLimits {
    fn from(settings: &GraphSettings) -> Self {
        Self::new(settings.min_strength, settings.max_secondary_nodes)
    }
}

/// What happened to a relation offered to the accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Admission {
    /// Candidate was already a node; edge kept
    Existing,
    /// Candidate added as a secondary node; edge kept
    Added,
    /// Secondary cap reached; edge dropped
    Dropped,
}

/// Node map, secondary counter and edge list threaded through both passes
struct GraphAccumulator {
    nodes: Vec<GraphNode>,
    present: HashSet<ConceptId>,
    edges: Vec<GraphEdge>,
    secondary_added: usize,
    max_secondary: usize,
    dropped: usize,
}

impl GraphAccumulator {
    fn new(max_secondary: usize) -> Self {
        Self {
            nodes: Vec::new(),
            present: HashSet::new(),
            edges: Vec::new(),
            secondary_added: 0,
            max_secondary,
            dropped: 0,
        }
    }

    fn add_primary(&mut self, concept: &Concept) {
        if self.present.insert(concept.id) {
            self.nodes.push(GraphNode::article_node(concept, true));
        }
    }

    fn offer(&mut self, relation: &ConceptRelation, candidate: &Concept) {
        let admission = if self.present.contains(&candidate.id) {
            Admission::Existing
        } else if self.secondary_added >= self.max_secondary {
            Admission::Dropped
        } else {
            self.present.insert(candidate.id);
            self.nodes.push(GraphNode::article_node(candidate, false));
            self.secondary_added += 1;
            Admission::Added
        };

        match admission {
            Admission::Dropped => self.dropped += 1,
            Admission::Existing | Admission::Added => {
                self.edges.push(GraphEdge::from_relation(relation))
            }
        }
    }

    fn finish(self, article: ArticleId) -> Graph {
        debug!(
            article = %article,
            primary = self.nodes.len() - self.secondary_added,
            secondary = self.secondary_added,
            edges = self.edges.len(),
            dropped = self.dropped,
            "built article context graph"
        );
        Graph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}

/// Builds article context graphs from the store
///
/// Reads only; persisting the result is the gateway's job.
#[derive(Clone)]
pub struct GraphCacheBuilder {
    store: Arc<dyn ConceptGraphStore>,
}

impl GraphCacheBuilder {
    pub fn new(store: Arc<dyn ConceptGraphStore>) -> Self {
        Self { store }
    }

    /// Build the context graph for an article.
    ///
    /// An article with no linked concepts (or an unknown article ID) yields
    /// the empty graph.
    pub fn build(&self, article: ArticleId, limits: BuildLimits) -> StorageResult<Graph> {
        let primaries = self.store.article_concepts(article)?;
        if primaries.is_empty() {
            return Ok(Graph::empty());
        }

        let primary_ids: Vec<ConceptId> = primaries.iter().map(|c| c.id).collect();
        let outgoing = self.store.relations_from(&primary_ids, limits.min_strength)?;
        let incoming = self.store.relations_to(&primary_ids, limits.min_strength)?;
        let index = RelationIndex::build(outgoing.into_iter().chain(incoming));

        let primary_set: HashSet<ConceptId> = primary_ids.iter().copied().collect();
        let pass_a = index.ranked(&primary_ids, Direction::Outgoing);
        let pass_b: Vec<&ConceptRelation> = index
            .ranked(&primary_ids, Direction::Incoming)
            .into_iter()
            .filter(|r| !primary_set.contains(&r.from))
            .collect();

        let candidate_ids: Vec<ConceptId> = pass_a
            .iter()
            .map(|r| r.to)
            .chain(pass_b.iter().map(|r| r.from))
            .filter(|id| !primary_set.contains(id))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let mut concepts: HashMap<ConceptId, Concept> = self
            .store
            .load_concepts(&candidate_ids)?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        for concept in &primaries {
            concepts.insert(concept.id, concept.clone());
        }

        let mut acc = GraphAccumulator::new(limits.max_secondary_nodes);
        for concept in &primaries {
            acc.add_primary(concept);
        }
        for (pass, direction) in [(pass_a, Direction::Outgoing), (pass_b, Direction::Incoming)] {
            for relation in pass {
                // Endpoints always exist while foreign keys hold; skip if not.
                if let Some(candidate) = concepts.get(&direction.neighbor(relation)) {
                    acc.offer(relation, candidate);
                }
            }
        }

        Ok(acc.finish(article))
    }
}
