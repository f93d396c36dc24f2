//! Article context graphs: construction bounds, determinism and cached reads

mod common;

use common::{random_graph, Fixture, RandomGraphConfig};
use conceptmap::{ConceptGraphStore, GraphSettings, UserId};
use std::collections::HashSet;

const SEEDS: std::ops::Range<u64> = 0..24;

#[test]
fn test_concrete_scenario() {
    let mut fx = Fixture::new();
    let article = fx.article(&["A", "B"]);
    fx.relate("A", "C", 5).relate("C", "D", 2).relate("B", "E", 4);

    let graph = fx.api().build_article_graph(article, 3, 1).unwrap();

    let labels: Vec<_> = graph.nodes.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, vec!["A", "B", "C"]);
    assert_eq!(graph.edges.len(), 1);
    assert_eq!((graph.edges[0].from, graph.edges[0].to), (fx.id("A"), fx.id("C")));
    assert_eq!(graph.node(fx.id("C")).unwrap().is_primary, Some(false));
}

#[test]
fn test_secondary_cap_holds() {
    for seed in SEEDS {
        let rg = random_graph(seed, RandomGraphConfig::default());
        let api = conceptmap::ConceptMapApi::new(rg.store.clone(), GraphSettings::default());
        for cap in [0, 1, 3, 15] {
            let graph = api.build_article_graph(rg.article, 3, cap).unwrap();
            assert!(
                graph.secondary_count() <= cap,
                "seed {} cap {}: {} secondary nodes",
                seed,
                cap,
                graph.secondary_count()
            );
        }
    }
}

#[test]
fn test_every_primary_is_a_node() {
    for seed in SEEDS {
        let rg = random_graph(seed, RandomGraphConfig::default());
        let api = conceptmap::ConceptMapApi::new(rg.store.clone(), GraphSettings::default());
        let graph = api.build_article_graph(rg.article, 10, 0).unwrap();

        let primaries: Vec<_> = graph
            .nodes
            .iter()
            .filter(|n| n.is_primary == Some(true))
            .map(|n| n.id)
            .collect();
        assert_eq!(primaries, rg.primaries, "seed {}", seed);
    }
}

#[test]
fn test_edges_only_join_present_nodes() {
    for seed in SEEDS {
        let rg = random_graph(seed, RandomGraphConfig::default());
        let api = conceptmap::ConceptMapApi::new(rg.store.clone(), GraphSettings::default());
        let graph = api.build_article_graph(rg.article, 3, 5).unwrap();

        let ids: HashSet<_> = graph.nodes.iter().map(|n| n.id).collect();
        for edge in &graph.edges {
            assert!(ids.contains(&edge.from) && ids.contains(&edge.to), "seed {}", seed);
            assert!(edge.strength >= 3);
            assert!(edge.width.is_none());
        }
    }
}

#[test]
fn test_build_is_deterministic() {
    for seed in SEEDS {
        let rg = random_graph(seed, RandomGraphConfig::default());
        let api = conceptmap::ConceptMapApi::new(rg.store.clone(), GraphSettings::default());
        let first = api.build_article_graph(rg.article, 3, 15).unwrap();
        let second = api.build_article_graph(rg.article, 3, 15).unwrap();
        assert_eq!(first, second, "seed {}", seed);
    }
}

#[test]
fn test_raising_min_strength_never_adds_edges() {
    // With a cap that never binds, the edge set shrinks as the threshold rises
    let config = RandomGraphConfig::default();
    for seed in SEEDS {
        let rg = random_graph(seed, config);
        let api = conceptmap::ConceptMapApi::new(rg.store.clone(), GraphSettings::default());
        let mut previous = usize::MAX;
        for min_strength in 1..=10 {
            let edges = api
                .build_article_graph(rg.article, min_strength, config.concepts)
                .unwrap()
                .edges
                .len();
            assert!(edges <= previous, "seed {} min {}", seed, min_strength);
            previous = edges;
        }
    }
}

#[test]
fn test_lowering_cap_never_adds_secondary_nodes() {
    for seed in SEEDS {
        let rg = random_graph(seed, RandomGraphConfig::default());
        let api = conceptmap::ConceptMapApi::new(rg.store.clone(), GraphSettings::default());
        let mut previous = usize::MAX;
        for cap in (0..=20).rev() {
            let secondary = api.build_article_graph(rg.article, 3, cap).unwrap().secondary_count();
            assert!(secondary <= previous, "seed {} cap {}", seed, cap);
            previous = secondary;
        }
    }
}

#[test]
fn test_overlay_differs_only_in_collection_flags() {
    for seed in 0..8 {
        let rg = random_graph(seed, RandomGraphConfig::default());
        let api = conceptmap::ConceptMapApi::new(rg.store.clone(), GraphSettings::default());
        let (alice, bob) = (UserId::new(1), UserId::new(2));
        for id in rg.concepts.iter().step_by(3) {
            rg.store.create_collection(alice, *id).unwrap();
        }

        let for_alice = api.get_article_context(rg.article, alice).unwrap();
        let cached = rg.store.load_article(rg.article).unwrap().unwrap().graph_cache;
        let for_bob = api.get_article_context(rg.article, bob).unwrap();
        let cached_after = rg.store.load_article(rg.article).unwrap().unwrap().graph_cache;
        assert_eq!(cached, cached_after, "seed {}", seed);

        let collected = rg.store.collected_concept_ids(alice).unwrap();
        assert_eq!(for_alice.edges, for_bob.edges);
        assert_eq!(for_alice.nodes.len(), for_bob.nodes.len());
        for (a, b) in for_alice.nodes.iter().zip(&for_bob.nodes) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.is_primary, b.is_primary);
            assert_eq!(a.is_collected, collected.contains(&a.id));
            assert!(!b.is_collected);
        }
    }
}

#[test]
fn test_cached_read_matches_default_build() {
    let rg = random_graph(99, RandomGraphConfig::default());
    let api = conceptmap::ConceptMapApi::new(rg.store.clone(), GraphSettings::default());

    let built = api.build_article_graph(rg.article, 3, 15).unwrap();
    let served = api.get_article_context(rg.article, UserId::new(5)).unwrap();
    assert_eq!(built, served);
}

#[test]
fn test_cache_is_not_invalidated_by_new_relations() {
    let mut fx = Fixture::new();
    let article = fx.article(&["Rust"]);
    let api = fx.api();

    let before = api.get_article_context(article, UserId::new(1)).unwrap();
    fx.relate("Rust", "WebAssembly", 9);
    let after = api.get_article_context(article, UserId::new(1)).unwrap();
    assert_eq!(before, after);

    // A fresh build sees the new relation
    let rebuilt = api.build_article_graph(article, 3, 15).unwrap();
    assert_eq!(rebuilt.nodes.len(), 2);
}

#[test]
fn test_configured_cap_applies_to_cached_reads() {
    let mut fx = Fixture::new();
    let article = fx.article(&["Core"]);
    for (name, strength) in [("One", 9), ("Two", 8), ("Three", 7)] {
        fx.relate("Core", name, strength);
    }
    let api = fx.api_with(GraphSettings {
        max_secondary_nodes: 2,
        ..GraphSettings::default()
    });

    let graph = api.get_article_context(article, UserId::new(1)).unwrap();
    let labels: Vec<_> = graph.nodes.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, vec!["Core", "One", "Two"]);
}

#[test]
fn test_deleting_article_drops_its_cache() {
    let mut fx = Fixture::new();
    let article = fx.article(&["Rust"]);
    let api = fx.api();
    api.get_article_context(article, UserId::new(1)).unwrap();

    assert!(fx.store.delete_article(article).unwrap());
    let graph = api.get_article_context(article, UserId::new(1)).unwrap();
    assert!(graph.is_empty());
    assert!(fx.store.load_concept(fx.id("Rust")).unwrap().is_some());
}
