//! Named-concept fixture over an in-memory store

use conceptmap::{
    ArticleId, ConceptGraphStore, ConceptId, ConceptMapApi, GraphSettings, NewArticle,
    NewConcept, NewRelation, OpenStore, SqliteStore, UserId,
};
use std::collections::HashMap;
use std::sync::Arc;

pub struct Fixture {
    pub store: Arc<SqliteStore>,
    concepts: HashMap<String, ConceptId>,
    articles: usize,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            store: Arc::new(SqliteStore::open_in_memory().unwrap()),
            concepts: HashMap::new(),
            articles: 0,
        }
    }

    /// Id of a named concept, inserting it on first use
    pub fn concept(&mut self, name: &str) -> ConceptId {
        if let Some(id) = self.concepts.get(name) {
            return *id;
        }
        let id = self
            .store
            .insert_concept(&NewConcept::new(name).with_description(format!("About {}", name)))
            .unwrap()
            .id;
        self.concepts.insert(name.to_string(), id);
        id
    }

    /// Insert an article mentioning the named concepts
    pub fn article(&mut self, concepts: &[&str]) -> ArticleId {
        self.articles += 1;
        let article = self
            .store
            .insert_article(&NewArticle::new(
                format!("Article {}", self.articles),
                format!("https://news.test/{}", self.articles),
            ))
            .unwrap()
            .id;
        for name in concepts {
            let id = self.concept(name);
            self.store.link_article_concept(article, id).unwrap();
        }
        article
    }

    pub fn relate(&mut self, from: &str, to: &str, strength: u8) -> &mut Self {
        let from = self.concept(from);
        let to = self.concept(to);
        self.store
            .insert_relation(&NewRelation::new(from, to, strength))
            .unwrap();
        self
    }

    pub fn collect(&mut self, user: UserId, name: &str) -> &mut Self {
        let id = self.concept(name);
        self.store.create_collection(user, id).unwrap();
        self
    }

    pub fn id(&self, name: &str) -> ConceptId {
        self.concepts[name]
    }

    pub fn api(&self) -> ConceptMapApi {
        self.api_with(GraphSettings::default())
    }

    pub fn api_with(&self, settings: GraphSettings) -> ConceptMapApi {
        ConceptMapApi::new(self.store.clone(), settings)
    }
}
