//! conceptmap: concept graphs for a news reader
//!
//! Articles mention technical concepts; concepts are linked by directed,
//! weighted relations. This crate serves two graph views over that store:
//!
//! - **Article context graphs**: the article's own concepts plus a bounded
//!   set of strongly related neighbors, built once and cached on the article.
//!   Each read stamps the reader's collection state onto a copy.
//! - **Personal knowledge maps**: the subgraph induced by the concepts a user
//!   has collected, with summary statistics. Always computed live.
//!
//! Collecting a concept also reports which already-collected concepts it is
//! strongly related to.
//!
//! # Example
//!
//! ```
//! use conceptmap::{ConceptMapApi, GraphSettings, OpenStore, SqliteStore, UserId};
//! use std::sync::Arc;
//!
//! let store = Arc::new(SqliteStore::open_in_memory().unwrap());
//! let api = ConceptMapApi::new(store, GraphSettings::default());
//! let map = api.get_user_knowledge_map(UserId::new(1)).unwrap();
//! assert!(map.graph.is_empty());
//! ```

pub mod api;
pub mod catalog;
pub mod collection;
pub mod config;
pub mod context;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod storage;

pub use api::ConceptMapApi;
pub use catalog::{ConceptCatalog, ConceptDetail, RelatedArticle, RelatedConcept};
pub use collection::{
    CollectOutcome, CollectionService, Connection, ConnectionDiscovery, KnowledgeMap,
    KnowledgeMapStats, MostConnected, UserKnowledgeMapAssembler,
};
pub use config::{ConfigError, GraphSettings};
pub use context::{BuildLimits, GraphCacheBuilder, GraphCacheGateway};
pub use error::{ConceptMapError, ConceptMapResult, Resource};
pub use graph::{
    Article, ArticleId, CollectedConcept, CollectionEntry, Concept, ConceptId, ConceptRelation,
    Graph, GraphEdge, GraphNode, NewArticle, NewConcept, NewRelation, UserId,
};
pub use ingest::{IngestBatch, IngestError, IngestLoader, IngestReport};
pub use storage::{
    ArticleBatch, BatchRelation, BatchWrite, CollectionQuery, CollectionSort, ConceptGraphStore,
    OpenStore, SortOrder, SqliteStore, StorageError, StorageResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
