//! Core data structures: stored entities and the graph shape served to readers

mod index;
mod model;
mod view;

#[cfg(test)]
mod tests;

pub use index::{Direction, RelationIndex};
pub use model::{
    Article, ArticleId, CollectedConcept, CollectionEntry, Concept, ConceptId, ConceptRelation,
    EntryId, NewArticle, NewConcept, NewRelation, RelationId, UserId, MAX_RELATION_STRENGTH,
    MIN_RELATION_STRENGTH, PLACEHOLDER_DESCRIPTION,
};
pub use view::{Graph, GraphEdge, GraphNode};
