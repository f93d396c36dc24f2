//! A user's personal knowledge map
//!
//! The subgraph induced by everything the user has collected, plus summary
//! statistics. It changes with every collect/remove and is private to the
//! user, so it is always computed live and never cached.

use crate::graph::{ConceptId, Graph, GraphEdge, GraphNode, UserId};
use crate::storage::{CollectionQuery, ConceptGraphStore, StorageResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The concept with the most edge endpoints on the map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MostConnected {
    pub concept_id: ConceptId,
    pub name: String,
    pub connection_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeMapStats {
    pub total_concepts: usize,
    pub total_connections: usize,
    /// Edges at or above the strong-connection threshold
    pub strong_connections: usize,
    /// Mean edge strength; 0 when there are no edges
    pub average_strength: f64,
    pub most_connected_concept: Option<MostConnected>,
}

impl KnowledgeMapStats {
    /// Summarize a knowledge-map graph.
    ///
    /// Degree counts each appearance as an edge endpoint, so a self-loop
    /// counts twice. Equal degrees resolve to the lowest concept ID.
    pub fn compute(graph: &Graph, strong_threshold: u8) -> Self {
        let total_connections = graph.edges.len();
        let strong_connections = graph
            .edges
            .iter()
            .filter(|e| e.strength >= strong_threshold)
            .count();
        let average_strength = if total_connections == 0 {
            0.0
        } else {
            let sum: u64 = graph.edges.iter().map(|e| u64::from(e.strength)).sum();
            sum as f64 / total_connections as f64
        };

        let mut degree: BTreeMap<ConceptId, usize> = BTreeMap::new();
        for edge in &graph.edges {
            *degree.entry(edge.from).or_default() += 1;
            *degree.entry(edge.to).or_default() += 1;
        }
        // Ascending ID iteration, replacing only on a strictly higher count
        let mut best: Option<(ConceptId, usize)> = None;
        for (&id, &count) in &degree {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((id, count));
            }
        }
        let most_connected_concept = best.map(|(id, count)| MostConnected {
            concept_id: id,
            name: graph.node(id).map(|n| n.label.clone()).unwrap_or_default(),
            connection_count: count,
        });

        Self {
            total_concepts: graph.nodes.len(),
            total_connections,
            strong_connections,
            average_strength,
            most_connected_concept,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeMap {
    pub graph: Graph,
    pub stats: KnowledgeMapStats,
}

/// Assembles personal knowledge maps from the store
#[derive(Clone)]
pub struct UserKnowledgeMapAssembler {
    store: Arc<dyn ConceptGraphStore>,
    strong_threshold: u8,
}

impl UserKnowledgeMapAssembler {
    pub fn new(store: Arc<dyn ConceptGraphStore>, strong_threshold: u8) -> Self {
        Self {
            store,
            strong_threshold,
        }
    }

    pub fn assemble(&self, user: UserId) -> StorageResult<KnowledgeMap> {
        let mut collected = self.store.list_collections(user, &CollectionQuery::new())?;
        collected.sort_by_key(|entry| entry.concept.id);

        let nodes: Vec<GraphNode> = collected
            .iter()
            .map(|entry| GraphNode {
                is_collected: true,
                ..GraphNode::from_concept(&entry.concept)
            })
            .collect();
        let edges: Vec<GraphEdge> = self
            .store
            .collection_relations(user)?
            .iter()
            .map(GraphEdge::weighted)
            .collect();

        let graph = Graph { nodes, edges };
        let stats = KnowledgeMapStats::compute(&graph, self.strong_threshold);
        Ok(KnowledgeMap { graph, stats })
    }
}
