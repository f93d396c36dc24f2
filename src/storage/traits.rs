//! Storage trait definitions

use crate::graph::{
    Article, ArticleId, CollectedConcept, CollectionEntry, Concept, ConceptId, ConceptRelation,
    NewArticle, NewConcept, NewRelation, UserId,
};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Date parsing error: {0}")]
    DateParse(String),

    #[error("User {user_id} has already collected concept {concept_id}")]
    DuplicateCollection {
        user_id: UserId,
        concept_id: ConceptId,
    },

    #[error("Relation strength {0} is outside 1..=10")]
    InvalidStrength(u8),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Column used to order a user's collection listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectionSort {
    #[default]
    CollectedAt,
    Name,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Ordering for a user's collection listing
///
/// Defaults to newest collection first.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionQuery {
    pub sort: CollectionSort,
    pub order: SortOrder,
}

impl CollectionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort_by(mut self, sort: CollectionSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }
}

/// A relation inside an article batch, endpoints given by concept name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRelation {
    pub from: String,
    pub to: String,
    pub relation_type: Option<String>,
    pub strength: u8,
}

/// An article with its concepts and relations, written as one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleBatch {
    pub article: NewArticle,
    /// Concepts mentioned by the article; existing names are reused
    pub concepts: Vec<NewConcept>,
    pub relations: Vec<BatchRelation>,
}

/// What [`ConceptGraphStore::insert_article_batch`] wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchWrite {
    /// The new article, or the one already stored under the URL
    pub article_id: ArticleId,
    /// True when the URL was already stored and nothing was written
    pub duplicate: bool,
    pub created_concepts: usize,
    pub linked_concepts: usize,
    pub relations_added: usize,
    /// Relations skipped because an endpoint name matched no concept
    pub unresolved: Vec<BatchRelation>,
}

/// Trait for the relational concept store
///
/// Implementations must be thread-safe (Send + Sync) so one store can be
/// shared across request handlers. Deletes cascade: removing an article
/// removes its memberships and cache, removing a concept removes its
/// relations, memberships and collection entries.
pub trait ConceptGraphStore: Send + Sync {
    // === Article Operations ===

    /// Insert an article with no graph cache
    fn insert_article(&self, article: &NewArticle) -> StorageResult<Article>;

    /// Load an article (including its cache text) by ID
    fn load_article(&self, id: ArticleId) -> StorageResult<Option<Article>>;

    /// Load an article by its unique source URL
    fn find_article_by_url(&self, url: &str) -> StorageResult<Option<Article>>;

    /// Write an article, its concept links and its relations in one
    /// transaction. Nothing is written when the URL already exists or when
    /// any step fails.
    fn insert_article_batch(&self, batch: &ArticleBatch) -> StorageResult<BatchWrite>;

    /// Delete an article, its memberships and its cache
    fn delete_article(&self, id: ArticleId) -> StorageResult<bool>;

    /// Link a concept to an article. Returns false if the link already existed.
    fn link_article_concept(&self, article: ArticleId, concept: ConceptId) -> StorageResult<bool>;

    /// Concepts linked to an article, ascending by ID
    fn article_concepts(&self, article: ArticleId) -> StorageResult<Vec<Concept>>;

    /// Articles mentioning a concept, newest first
    fn concept_articles(&self, concept: ConceptId, limit: usize) -> StorageResult<Vec<Article>>;

    /// Store an article's graph cache if it has none yet.
    ///
    /// Returns true when this call wrote the cache. A cache, once written,
    /// is never replaced.
    fn save_graph_cache(&self, article: ArticleId, graph_json: &str) -> StorageResult<bool>;

    // === Concept Operations ===

    /// Insert a concept. Names are unique.
    fn insert_concept(&self, concept: &NewConcept) -> StorageResult<Concept>;

    /// Load a concept by ID
    fn load_concept(&self, id: ConceptId) -> StorageResult<Option<Concept>>;

    /// Load every concept in `ids` that exists, ascending by ID
    fn load_concepts(&self, ids: &[ConceptId]) -> StorageResult<Vec<Concept>>;

    /// Exact-name lookup
    fn find_concept_by_name(&self, name: &str) -> StorageResult<Option<Concept>>;

    /// Case-insensitive substring search on concept names, ordered by name
    fn search_concepts(&self, query: &str, limit: usize) -> StorageResult<Vec<Concept>>;

    /// Delete a concept and everything that references it
    fn delete_concept(&self, id: ConceptId) -> StorageResult<bool>;

    // === Relation Operations ===

    /// Insert a relation. Strength must be in `1..=10`.
    fn insert_relation(&self, relation: &NewRelation) -> StorageResult<ConceptRelation>;

    /// Relations whose source is in `sources` with strength >= `min_strength`
    fn relations_from(
        &self,
        sources: &[ConceptId],
        min_strength: u8,
    ) -> StorageResult<Vec<ConceptRelation>>;

    /// Relations whose target is in `targets` with strength >= `min_strength`
    fn relations_to(
        &self,
        targets: &[ConceptId],
        min_strength: u8,
    ) -> StorageResult<Vec<ConceptRelation>>;

    /// Relations with both endpoints in the user's collection, ascending by
    /// relation ID
    fn collection_relations(&self, user: UserId) -> StorageResult<Vec<ConceptRelation>>;

    // === Collection Operations ===

    /// IDs of every concept the user has collected
    fn collected_concept_ids(&self, user: UserId) -> StorageResult<BTreeSet<ConceptId>>;

    /// The user's entry for a concept, if any
    fn find_collection(
        &self,
        user: UserId,
        concept: ConceptId,
    ) -> StorageResult<Option<CollectionEntry>>;

    /// Create a collection entry in one transaction.
    ///
    /// Fails with [`StorageError::DuplicateCollection`] when the entry already
    /// exists, whether detected by the pre-check or by the unique constraint.
    fn create_collection(&self, user: UserId, concept: ConceptId)
        -> StorageResult<CollectionEntry>;

    /// Delete a collection entry. Returns false if there was none.
    fn delete_collection(&self, user: UserId, concept: ConceptId) -> StorageResult<bool>;

    /// The user's collected concepts in the requested order
    fn list_collections(
        &self,
        user: UserId,
        query: &CollectionQuery,
    ) -> StorageResult<Vec<CollectedConcept>>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: ConceptGraphStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}
