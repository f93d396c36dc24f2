//! The collection workflow: bookmarking concepts, discovering connections
//! among them, and the resulting personal knowledge map

mod discovery;
mod knowledge_map;
mod service;

pub use discovery::{Connection, ConnectionDiscovery};
pub use knowledge_map::{KnowledgeMap, KnowledgeMapStats, MostConnected, UserKnowledgeMapAssembler};
pub use service::{CollectOutcome, CollectionService};
