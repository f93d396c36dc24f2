//! Connections between a newly collected concept and the user's collection

use crate::graph::{ConceptId, Direction, RelationIndex, UserId};
use crate::storage::{ConceptGraphStore, StorageResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// An already-collected concept related to the one just collected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub concept_id: ConceptId,
    pub name: String,
    pub strength: u8,
    pub relation_type: Option<String>,
}

/// Finds strong relations between a new concept and a user's collection
///
/// Stateless: results are returned to the caller and never stored.
#[derive(Clone)]
pub struct ConnectionDiscovery {
    store: Arc<dyn ConceptGraphStore>,
}

impl ConnectionDiscovery {
    pub fn new(store: Arc<dyn ConceptGraphStore>) -> Self {
        Self { store }
    }

    /// Collected concepts linked to `new_concept` by a relation of at least
    /// `threshold`, in either direction.
    ///
    /// Relations leaving the new concept are reported before relations
    /// entering it; each group is ordered strongest first. A concept reached
    /// through several relations is reported once, via the first of them.
    pub fn find_new_connections(
        &self,
        user: UserId,
        new_concept: ConceptId,
        threshold: u8,
    ) -> StorageResult<Vec<Connection>> {
        let mut collected = self.store.collected_concept_ids(user)?;
        collected.remove(&new_concept);
        if collected.is_empty() {
            return Ok(Vec::new());
        }

        let origin = [new_concept];
        let index = RelationIndex::build(
            self.store
                .relations_from(&origin, threshold)?
                .into_iter()
                .chain(self.store.relations_to(&origin, threshold)?),
        );

        let mut seen = HashSet::new();
        let mut hits = Vec::new();
        for direction in [Direction::Outgoing, Direction::Incoming] {
            for relation in index.ranked(&origin, direction) {
                let neighbor = direction.neighbor(relation);
                if collected.contains(&neighbor) && seen.insert(neighbor) {
                    hits.push((neighbor, relation));
                }
            }
        }
        if hits.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<ConceptId> = hits.iter().map(|(id, _)| *id).collect();
        let names: HashMap<ConceptId, String> = self
            .store
            .load_concepts(&ids)?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        Ok(hits
            .into_iter()
            .filter_map(|(id, relation)| {
                names.get(&id).map(|name| Connection {
                    concept_id: id,
                    name: name.clone(),
                    strength: relation.strength,
                    relation_type: relation.relation_type.clone(),
                })
            })
            .collect())
    }
}
