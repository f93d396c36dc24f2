//! Concept lookup, search and get-or-create

use crate::error::{ConceptMapError, ConceptMapResult, Resource};
use crate::graph::{ArticleId, Concept, ConceptId, ConceptRelation, NewConcept, UserId};
use crate::storage::{ConceptGraphStore, StorageResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A concept one relation away from another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedConcept {
    pub concept_id: ConceptId,
    pub name: String,
    pub relation_type: Option<String>,
    pub strength: u8,
}

/// Article preview shown on a concept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedArticle {
    pub article_id: ArticleId,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// A concept with its neighborhood
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptDetail {
    #[serde(flatten)]
    pub concept: Concept,
    /// Targets of outgoing relations, then sources of incoming ones
    pub related_concepts: Vec<RelatedConcept>,
    pub related_articles: Vec<RelatedArticle>,
    /// Set when the detail was requested on behalf of a user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_collected: Option<bool>,
}

#[derive(Clone)]
pub struct ConceptCatalog {
    store: Arc<dyn ConceptGraphStore>,
    related_article_limit: usize,
}

impl ConceptCatalog {
    pub fn new(store: Arc<dyn ConceptGraphStore>, related_article_limit: usize) -> Self {
        Self {
            store,
            related_article_limit,
        }
    }

    pub fn get(&self, id: ConceptId, viewer: Option<UserId>) -> ConceptMapResult<ConceptDetail> {
        let concept = self
            .store
            .load_concept(id)?
            .ok_or_else(|| ConceptMapError::not_found(Resource::Concept, id))?;

        let outgoing = self.store.relations_from(&[id], 1)?;
        let incoming = self.store.relations_to(&[id], 1)?;
        let related_concepts = self.related(&outgoing, &incoming)?;

        let related_articles = self
            .store
            .concept_articles(id, self.related_article_limit)?
            .into_iter()
            .map(|a| RelatedArticle {
                article_id: a.id,
                title: a.display_title().to_string(),
                created_at: a.created_at,
            })
            .collect();

        let is_collected = match viewer {
            Some(user) => Some(self.store.find_collection(user, id)?.is_some()),
            None => None,
        };

        Ok(ConceptDetail {
            concept,
            related_concepts,
            related_articles,
            is_collected,
        })
    }

    fn related(
        &self,
        outgoing: &[ConceptRelation],
        incoming: &[ConceptRelation],
    ) -> StorageResult<Vec<RelatedConcept>> {
        let ends: Vec<(ConceptId, &ConceptRelation)> = outgoing
            .iter()
            .map(|r| (r.to, r))
            .chain(incoming.iter().map(|r| (r.from, r)))
            .collect();

        let ids: Vec<ConceptId> = ends.iter().map(|(id, _)| *id).collect();
        let names: HashMap<ConceptId, String> = self
            .store
            .load_concepts(&ids)?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        Ok(ends
            .into_iter()
            .filter_map(|(id, r)| {
                names.get(&id).map(|name| RelatedConcept {
                    concept_id: id,
                    name: name.clone(),
                    relation_type: r.relation_type.clone(),
                    strength: r.strength,
                })
            })
            .collect())
    }

    /// Concepts whose name contains `query`, ignoring case
    pub fn search(&self, query: &str, limit: usize) -> StorageResult<Vec<Concept>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.store.search_concepts(query, limit)
    }

    /// Find a concept by exact name, inserting it if absent.
    ///
    /// Returns the concept and whether it was created.
    pub fn get_or_create(&self, concept: &NewConcept) -> StorageResult<(Concept, bool)> {
        if let Some(existing) = self.store.find_concept_by_name(&concept.name)? {
            return Ok((existing, false));
        }
        let created = self.store.insert_concept(concept)?;
        debug!(concept = %created.id, name = %created.name, "concept created");
        Ok((created, true))
    }
}
