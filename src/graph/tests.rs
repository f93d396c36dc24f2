//! Serialization tests against the graph wire shape

use crate::graph::{Concept, ConceptId, ConceptRelation, Graph, GraphEdge, GraphNode, RelationId};
use serde_json::{json, Value};

/// Fixture: an article context graph as stored in the cache column
fn article_graph_fixture() -> Value {
    json!({
        "nodes": [
            {
                "id": 1,
                "label": "Transformer",
                "description": "Attention-based neural network architecture",
                "real_world_examples": ["GPT", "BERT"],
                "is_collected": false,
                "is_primary": true
            },
            {
                "id": 7,
                "label": "Attention",
                "description": "Weighted mixing of token representations",
                "real_world_examples": [],
                "is_collected": false,
                "is_primary": false
            }
        ],
        "edges": [
            { "from": 1, "to": 7, "strength": 8, "relation_type": "uses" }
        ]
    })
}

/// Fixture: a cache written before relation types were recorded
fn legacy_graph_fixture() -> Value {
    json!({
        "nodes": [
            { "id": 3, "label": "GPU", "description": "Parallel processor", "is_primary": true }
        ],
        "edges": [
            { "from": 3, "to": 4, "strength": 5 }
        ]
    })
}

fn concept(id: i64, name: &str) -> Concept {
    Concept {
        id: ConceptId::new(id),
        name: name.to_string(),
        description: format!("{} description", name),
        examples: vec![format!("{} in practice", name)],
    }
}

fn relation(from: i64, to: i64, strength: u8) -> ConceptRelation {
    ConceptRelation {
        id: RelationId::new(1),
        from: ConceptId::new(from),
        to: ConceptId::new(to),
        relation_type: None,
        strength,
    }
}

#[test]
fn test_concept_id_serializes_as_number() {
    let json = serde_json::to_string(&ConceptId::new(42)).unwrap();
    assert_eq!(json, "42");
}

#[test]
fn test_article_graph_fixture_deserializes() {
    let graph: Graph = serde_json::from_value(article_graph_fixture()).unwrap();
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.primary_count(), 1);
    assert_eq!(graph.secondary_count(), 1);
    assert_eq!(graph.edges[0].relation_type.as_deref(), Some("uses"));
    assert_eq!(graph.edges[0].width, None);
}

#[test]
fn test_legacy_graph_fills_defaults() {
    let graph: Graph = serde_json::from_value(legacy_graph_fixture()).unwrap();
    let node = &graph.nodes[0];
    assert!(node.real_world_examples.is_empty());
    assert!(!node.is_collected);
    assert_eq!(graph.edges[0].relation_type, None);
}

#[test]
fn test_article_node_carries_primary_flag() {
    let node = GraphNode::article_node(&concept(1, "Transformer"), true);
    let value = serde_json::to_value(&node).unwrap();
    assert_eq!(value["is_primary"], json!(true));
    assert_eq!(value["label"], json!("Transformer"));
    assert_eq!(value["real_world_examples"], json!(["Transformer in practice"]));
}

#[test]
fn test_plain_node_omits_primary_flag() {
    let node = GraphNode::from_concept(&concept(1, "Transformer"));
    let value = serde_json::to_value(&node).unwrap();
    assert!(value.get("is_primary").is_none());
}

#[test]
fn test_article_edge_omits_width_and_missing_type() {
    let edge = GraphEdge::from_relation(&relation(1, 2, 5));
    let value = serde_json::to_value(&edge).unwrap();
    assert_eq!(value, json!({ "from": 1, "to": 2, "strength": 5 }));
}

#[test]
fn test_weighted_edge_width_is_half_strength_at_least_one() {
    assert_eq!(GraphEdge::weighted(&relation(1, 2, 1)).width, Some(1));
    assert_eq!(GraphEdge::weighted(&relation(1, 2, 3)).width, Some(1));
    assert_eq!(GraphEdge::weighted(&relation(1, 2, 7)).width, Some(3));
    assert_eq!(GraphEdge::weighted(&relation(1, 2, 10)).width, Some(5));
}

#[test]
fn test_graph_json_survives_storage_format() {
    let graph: Graph = serde_json::from_value(article_graph_fixture()).unwrap();
    let text = graph.to_json().unwrap();
    assert_eq!(Graph::from_json(&text).unwrap(), graph);
}

#[test]
fn test_malformed_cache_text_fails_to_parse() {
    assert!(Graph::from_json("{\"nodes\": [").is_err());
    assert!(Graph::from_json("not json").is_err());
}
