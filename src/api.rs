//! Transport-independent API layer.
//!
//! `ConceptMapApi` is the single entry point for consumer-facing
//! operations. Transports (the CLI, an HTTP layer, direct embedding) call
//! its methods and never reach into the store or the components directly.

use std::sync::Arc;

use crate::catalog::{ConceptCatalog, ConceptDetail};
use crate::collection::{CollectOutcome, CollectionService, KnowledgeMap, UserKnowledgeMapAssembler};
use crate::config::GraphSettings;
use crate::context::{BuildLimits, GraphCacheBuilder, GraphCacheGateway};
use crate::error::{ConceptMapError, ConceptMapResult, Resource};
use crate::graph::{ArticleId, CollectedConcept, Concept, ConceptId, Graph, UserId};
use crate::ingest::{IngestBatch, IngestLoader, IngestReport};
use crate::storage::{CollectionQuery, ConceptGraphStore};

/// Single entry point for all consumer-facing operations.
#[derive(Clone)]
pub struct ConceptMapApi {
    store: Arc<dyn ConceptGraphStore>,
    settings: GraphSettings,
    builder: GraphCacheBuilder,
    gateway: GraphCacheGateway,
    collections: CollectionService,
    knowledge_maps: UserKnowledgeMapAssembler,
    catalog: ConceptCatalog,
}

impl ConceptMapApi {
    pub fn new(store: Arc<dyn ConceptGraphStore>, settings: GraphSettings) -> Self {
        Self {
            builder: GraphCacheBuilder::new(store.clone()),
            gateway: GraphCacheGateway::new(store.clone(), BuildLimits::from(&settings)),
            collections: CollectionService::new(store.clone(), settings.discovery_threshold),
            knowledge_maps: UserKnowledgeMapAssembler::new(
                store.clone(),
                settings.strong_connection_threshold,
            ),
            catalog: ConceptCatalog::new(store.clone(), settings.related_article_limit),
            store,
            settings,
        }
    }

    pub fn settings(&self) -> &GraphSettings {
        &self.settings
    }

    // --- Article graphs ---

    /// Build an article's context graph without touching its cache.
    pub fn build_article_graph(
        &self,
        article: ArticleId,
        min_strength: u8,
        max_secondary_nodes: usize,
    ) -> ConceptMapResult<Graph> {
        let limits = BuildLimits::new(min_strength, max_secondary_nodes);
        Ok(self.builder.build(article, limits)?)
    }

    /// The cached context graph of an article, stamped for `user`.
    pub fn get_article_context(&self, article: ArticleId, user: UserId) -> ConceptMapResult<Graph> {
        Ok(self.gateway.article_context(article, user)?)
    }

    /// Build and store an article's cache if it has none.
    ///
    /// Returns whether this call wrote it.
    pub fn warm_article_cache(&self, article: ArticleId) -> ConceptMapResult<bool> {
        if self.store.load_article(article)?.is_none() {
            return Err(ConceptMapError::not_found(Resource::Article, article));
        }
        Ok(self.gateway.warm(article)?)
    }

    // --- Collections ---

    pub fn collect_concept(
        &self,
        user: UserId,
        concept: ConceptId,
    ) -> ConceptMapResult<CollectOutcome> {
        self.collections.collect(user, concept)
    }

    /// Returns the name of the concept that was removed.
    pub fn remove_collection(&self, user: UserId, concept: ConceptId) -> ConceptMapResult<String> {
        self.collections.remove(user, concept)
    }

    pub fn list_collections(
        &self,
        user: UserId,
        query: &CollectionQuery,
    ) -> ConceptMapResult<Vec<CollectedConcept>> {
        self.collections.list(user, query)
    }

    pub fn get_user_knowledge_map(&self, user: UserId) -> ConceptMapResult<KnowledgeMap> {
        Ok(self.knowledge_maps.assemble(user)?)
    }

    // --- Concepts ---

    pub fn get_concept(
        &self,
        concept: ConceptId,
        viewer: Option<UserId>,
    ) -> ConceptMapResult<ConceptDetail> {
        self.catalog.get(concept, viewer)
    }

    /// Name search; `limit` falls back to the configured default.
    pub fn search_concepts(&self, query: &str, limit: Option<usize>) -> ConceptMapResult<Vec<Concept>> {
        let limit = limit.unwrap_or(self.settings.search_limit);
        Ok(self.catalog.search(query, limit)?)
    }

    // --- Write ---

    pub fn ingest(&self, batch: &IngestBatch, warm: bool) -> ConceptMapResult<IngestReport> {
        let loader = IngestLoader::new(self.store.clone(), self.gateway.clone());
        Ok(loader.load(batch, warm)?)
    }
}
