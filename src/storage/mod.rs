//! Storage backends for conceptmap
//!
//! Components talk to storage through the `ConceptGraphStore` trait.
//! The primary implementation is `SqliteStore` for persistent storage.

mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{
    ArticleBatch, BatchRelation, BatchWrite, CollectionQuery, CollectionSort, ConceptGraphStore,
    OpenStore, SortOrder, StorageError, StorageResult,
};
