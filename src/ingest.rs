//! Batch loader for analyzed articles
//!
//! An upstream analysis step produces one batch per article: the article,
//! the concepts it mentions and weighted relations between them. Loading
//! a batch is the only way new articles enter the store.
//!
//! ```json
//! {
//!   "article": {"title": "...", "original_url": "https://...", "summary": "..."},
//!   "concepts": [{"name": "Kafka", "description": "...", "examples": ["..."]}],
//!   "relations": [{"from": "Kafka", "to": "Stream Processing", "strength": 8}]
//! }
//! ```

use crate::context::GraphCacheGateway;
use crate::graph::{ArticleId, NewArticle, NewConcept, MAX_RELATION_STRENGTH, MIN_RELATION_STRENGTH};
use crate::storage::{ArticleBatch, BatchRelation, ConceptGraphStore, StorageResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors reading a batch file
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid batch: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConcept {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// A relation between two concepts, referenced by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestRelation {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub relation_type: Option<String>,
    /// Clamped into `1..=10` on load
    pub strength: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestBatch {
    pub article: NewArticle,
    #[serde(default)]
    pub concepts: Vec<IngestConcept>,
    #[serde(default)]
    pub relations: Vec<IngestRelation>,
}

impl IngestBatch {
    pub fn from_json(text: &str) -> Result<Self, IngestError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, IngestError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// What a load changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// The new article, or the existing one when the URL was already loaded
    pub article_id: Option<ArticleId>,
    /// True when the batch was skipped because its URL already exists
    pub duplicate: bool,
    pub created_concepts: usize,
    pub linked_concepts: usize,
    pub relations_added: usize,
    pub relations_skipped: usize,
    pub cache_warmed: bool,
}

pub struct IngestLoader {
    store: Arc<dyn ConceptGraphStore>,
    gateway: GraphCacheGateway,
}

impl IngestLoader {
    pub fn new(store: Arc<dyn ConceptGraphStore>, gateway: GraphCacheGateway) -> Self {
        Self { store, gateway }
    }

    /// Store one batch, optionally building the article's cache afterwards.
    ///
    /// The article, its concepts and its relations are written in a single
    /// transaction: a failure leaves nothing behind, and a batch whose URL is
    /// already stored is skipped entirely.
    pub fn load(&self, batch: &IngestBatch, warm: bool) -> StorageResult<IngestReport> {
        let write = self.store.insert_article_batch(&Self::prepare(batch))?;
        if write.duplicate {
            info!(article = %write.article_id, url = %batch.article.original_url.trim(), "article already loaded, skipping batch");
            return Ok(IngestReport {
                article_id: Some(write.article_id),
                duplicate: true,
                ..IngestReport::default()
            });
        }

        for relation in &write.unresolved {
            warn!(from = %relation.from, to = %relation.to, "relation names an unknown concept, skipping");
        }

        let mut report = IngestReport {
            article_id: Some(write.article_id),
            duplicate: false,
            created_concepts: write.created_concepts,
            linked_concepts: write.linked_concepts,
            relations_added: write.relations_added,
            relations_skipped: write.unresolved.len(),
            cache_warmed: false,
        };
        if warm {
            report.cache_warmed = self.gateway.warm(write.article_id)?;
        }

        info!(
            article = %write.article_id,
            concepts = report.linked_concepts,
            relations = report.relations_added,
            "batch loaded"
        );
        Ok(report)
    }

    /// Normalize names and strengths; blank concept names are dropped
    fn prepare(batch: &IngestBatch) -> ArticleBatch {
        let article = NewArticle {
            original_url: batch.article.original_url.trim().to_string(),
            ..batch.article.clone()
        };

        let concepts = batch
            .concepts
            .iter()
            .filter(|item| !item.name.trim().is_empty())
            .map(|item| {
                NewConcept::new(item.name.trim())
                    .with_description(item.description.clone().unwrap_or_default())
                    .with_examples(item.examples.clone())
            })
            .collect();

        let relations = batch
            .relations
            .iter()
            .map(|item| BatchRelation {
                from: item.from.trim().to_string(),
                to: item.to.trim().to_string(),
                relation_type: item.relation_type.clone(),
                strength: item
                    .strength
                    .clamp(i64::from(MIN_RELATION_STRENGTH), i64::from(MAX_RELATION_STRENGTH))
                    as u8,
            })
            .collect();

        ArticleBatch {
            article,
            concepts,
            relations,
        }
    }
}
