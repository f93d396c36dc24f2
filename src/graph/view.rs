//! Graph shape shared by article context graphs and personal knowledge maps
//!
//! This is also the persisted cache format: an article's cache is this
//! structure serialized as JSON text.

use super::model::{Concept, ConceptId, ConceptRelation};
use serde::{Deserialize, Serialize};

/// A concept rendered as a graph node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: ConceptId,
    pub label: String,
    pub description: String,
    #[serde(default)]
    pub real_world_examples: Vec<String>,
    /// Whether the requesting user has collected this concept.
    /// Always `false` inside a stored cache.
    #[serde(default)]
    pub is_collected: bool,
    /// Present on article graphs only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
}

impl GraphNode {
    /// Node for a concept with no flags set
    pub fn from_concept(concept: &Concept) -> Self {
        Self {
            id: concept.id,
            label: concept.name.clone(),
            description: concept.description.clone(),
            real_world_examples: concept.examples.clone(),
            is_collected: false,
            is_primary: None,
        }
    }

    /// Node for an article graph
    pub fn article_node(concept: &Concept, is_primary: bool) -> Self {
        Self {
            is_primary: Some(is_primary),
            ..Self::from_concept(concept)
        }
    }

    pub fn is_secondary(&self) -> bool {
        self.is_primary == Some(false)
    }
}

/// A relation rendered as a graph edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: ConceptId,
    pub to: ConceptId,
    pub strength: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_type: Option<String>,
    /// Display width, present on personal knowledge maps only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u8>,
}

impl GraphEdge {
    /// Edge for an article graph
    pub fn from_relation(relation: &ConceptRelation) -> Self {
        Self {
            from: relation.from,
            to: relation.to,
            strength: relation.strength,
            relation_type: relation.relation_type.clone(),
            width: None,
        }
    }

    /// Edge for a personal knowledge map, with `width = max(1, strength / 2)`
    pub fn weighted(relation: &ConceptRelation) -> Self {
        Self {
            width: Some((relation.strength / 2).max(1)),
            ..Self::from_relation(relation)
        }
    }
}

/// A set of nodes and the edges between them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: ConceptId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn primary_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_primary == Some(true)).count()
    }

    pub fn secondary_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_secondary()).count()
    }

    /// Parse a stored cache blob
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Serialize for storage as a cache blob
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
