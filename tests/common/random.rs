//! Seeded random stores for property checks

use conceptmap::{
    ArticleId, ConceptGraphStore, ConceptId, NewArticle, NewConcept, NewRelation, OpenStore,
    SqliteStore,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
pub struct RandomGraphConfig {
    pub concepts: usize,
    pub relations: usize,
    /// Concepts linked to the generated article
    pub primaries: usize,
}

impl Default for RandomGraphConfig {
    fn default() -> Self {
        Self {
            concepts: 40,
            relations: 160,
            primaries: 4,
        }
    }
}

pub struct RandomGraph {
    pub store: Arc<SqliteStore>,
    pub article: ArticleId,
    pub concepts: Vec<ConceptId>,
    pub primaries: Vec<ConceptId>,
}

/// Build a store with random relations (parallel edges and self-loops allowed)
pub fn random_graph(seed: u64, config: RandomGraphConfig) -> RandomGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());

    let concepts: Vec<ConceptId> = (0..config.concepts)
        .map(|i| {
            store
                .insert_concept(&NewConcept::new(format!("concept-{}", i)))
                .unwrap()
                .id
        })
        .collect();

    for _ in 0..config.relations {
        let from = concepts[rng.gen_range(0..concepts.len())];
        let to = concepts[rng.gen_range(0..concepts.len())];
        let strength = rng.gen_range(1..=10);
        store
            .insert_relation(&NewRelation::new(from, to, strength))
            .unwrap();
    }

    let article = store
        .insert_article(&NewArticle::new(
            format!("Random {}", seed),
            format!("https://news.test/random/{}", seed),
        ))
        .unwrap()
        .id;
    let mut primaries = Vec::new();
    while primaries.len() < config.primaries.min(concepts.len()) {
        let pick = concepts[rng.gen_range(0..concepts.len())];
        if !primaries.contains(&pick) {
            store.link_article_concept(article, pick).unwrap();
            primaries.push(pick);
        }
    }
    primaries.sort();

    RandomGraph {
        store,
        article,
        concepts,
        primaries,
    }
}
