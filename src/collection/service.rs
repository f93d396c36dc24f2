//! Collect / remove / list workflow

use super::discovery::{Connection, ConnectionDiscovery};
use crate::error::{ConceptMapError, ConceptMapResult, Resource};
use crate::graph::{CollectedConcept, CollectionEntry, ConceptId, UserId};
use crate::storage::{CollectionQuery, ConceptGraphStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Result of collecting a concept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectOutcome {
    pub entry: CollectionEntry,
    pub concept_name: String,
    /// Collected concepts strongly related to the new one
    pub new_connections: Vec<Connection>,
}

#[derive(Clone)]
pub struct CollectionService {
    store: Arc<dyn ConceptGraphStore>,
    discovery: ConnectionDiscovery,
    discovery_threshold: u8,
}

impl CollectionService {
    pub fn new(store: Arc<dyn ConceptGraphStore>, discovery_threshold: u8) -> Self {
        Self {
            discovery: ConnectionDiscovery::new(store.clone()),
            store,
            discovery_threshold,
        }
    }

    /// Bookmark a concept for a user and report new strong connections.
    ///
    /// Fails with `NotFound` for an unknown concept and `Duplicate` when the
    /// user already collected it.
    pub fn collect(&self, user: UserId, concept: ConceptId) -> ConceptMapResult<CollectOutcome> {
        let record = self
            .store
            .load_concept(concept)?
            .ok_or_else(|| ConceptMapError::not_found(Resource::Concept, concept))?;

        let entry = self.store.create_collection(user, concept)?;
        let new_connections =
            self.discovery
                .find_new_connections(user, concept, self.discovery_threshold)?;

        info!(
            user = %user,
            concept = %concept,
            connections = new_connections.len(),
            "concept collected"
        );
        Ok(CollectOutcome {
            entry,
            concept_name: record.name,
            new_connections,
        })
    }

    /// Remove a user's bookmark, returning the concept's name
    pub fn remove(&self, user: UserId, concept: ConceptId) -> ConceptMapResult<String> {
        if self.store.find_collection(user, concept)?.is_none() {
            return Err(ConceptMapError::not_found(Resource::Collection, concept));
        }
        let name = self
            .store
            .load_concept(concept)?
            .map(|c| c.name)
            .ok_or_else(|| ConceptMapError::not_found(Resource::Concept, concept))?;

        if !self.store.delete_collection(user, concept)? {
            // Removed concurrently between lookup and delete
            return Err(ConceptMapError::not_found(Resource::Collection, concept));
        }
        info!(user = %user, concept = %concept, "collection removed");
        Ok(name)
    }

    pub fn list(
        &self,
        user: UserId,
        query: &CollectionQuery,
    ) -> ConceptMapResult<Vec<CollectedConcept>> {
        Ok(self.store.list_collections(user, query)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NewConcept, NewRelation};
    use crate::storage::{CollectionSort, OpenStore, SortOrder, SqliteStore};

    fn setup() -> (Arc<SqliteStore>, CollectionService) {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let service = CollectionService::new(store.clone(), 3);
        (store, service)
    }

    fn concept(store: &SqliteStore, name: &str) -> ConceptId {
        store.insert_concept(&NewConcept::new(name)).unwrap().id
    }

    #[test]
    fn test_collect_returns_entry_and_name() {
        let (store, service) = setup();
        let k = concept(&store, "Kafka");

        let outcome = service.collect(UserId::new(1), k).unwrap();
        assert_eq!(outcome.concept_name, "Kafka");
        assert_eq!(outcome.entry.concept_id, k);
        assert!(outcome.new_connections.is_empty());
    }

    #[test]
    fn test_collect_twice_is_duplicate_with_single_entry() {
        let (store, service) = setup();
        let user = UserId::new(1);
        let k = concept(&store, "Kafka");

        service.collect(user, k).unwrap();
        let err = service.collect(user, k).unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(store.collected_concept_ids(user).unwrap().len(), 1);
    }

    #[test]
    fn test_collect_unknown_concept_is_not_found() {
        let (_store, service) = setup();
        let err = service.collect(UserId::new(1), ConceptId::new(77)).unwrap_err();
        assert!(matches!(
            err,
            ConceptMapError::NotFound { resource: Resource::Concept, id: 77 }
        ));
    }

    #[test]
    fn test_collect_reports_connections() {
        let (store, service) = setup();
        let user = UserId::new(1);
        let kafka = concept(&store, "Kafka");
        let stream = concept(&store, "Stream Processing");
        store.insert_relation(&NewRelation::new(kafka, stream, 8)).unwrap();

        service.collect(user, stream).unwrap();
        let outcome = service.collect(user, kafka).unwrap();
        assert_eq!(outcome.new_connections.len(), 1);
        assert_eq!(outcome.new_connections[0].concept_id, stream);
    }

    #[test]
    fn test_remove_returns_name() {
        let (store, service) = setup();
        let user = UserId::new(1);
        let k = concept(&store, "Kafka");
        service.collect(user, k).unwrap();

        assert_eq!(service.remove(user, k).unwrap(), "Kafka");
        assert!(store.find_collection(user, k).unwrap().is_none());
        // Can be collected again afterwards
        assert!(service.collect(user, k).is_ok());
    }

    #[test]
    fn test_remove_uncollected_is_not_found() {
        let (store, service) = setup();
        let k = concept(&store, "Kafka");
        let err = service.remove(UserId::new(1), k).unwrap_err();
        assert!(matches!(
            err,
            ConceptMapError::NotFound { resource: Resource::Collection, .. }
        ));
    }

    #[test]
    fn test_list_sorted_by_name() {
        let (store, service) = setup();
        let user = UserId::new(1);
        for name in ["Redis", "Docker", "Nginx"] {
            service.collect(user, concept(&store, name)).unwrap();
        }

        let query = CollectionQuery::new()
            .sort_by(CollectionSort::Name)
            .order(SortOrder::Asc);
        let names: Vec<_> = service
            .list(user, &query)
            .unwrap()
            .into_iter()
            .map(|c| c.concept.name)
            .collect();
        assert_eq!(names, vec!["Docker", "Nginx", "Redis"]);
    }
}
