//! Read-through access to article context graphs
//!
//! The cache stored on an article is shared by every reader and never
//! changes once written. Each read stamps the requesting user's collection
//! state onto a copy; that overlay is never written back.
//!
//! Two first reads of an uncached article may both build the graph. The
//! store keeps whichever write lands first; since the build is a pure
//! function of the store contents, both writes carry the same graph.

use super::builder::{BuildLimits, GraphCacheBuilder};
use crate::graph::{ArticleId, Graph, UserId};
use crate::storage::{ConceptGraphStore, StorageResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Serves cached article graphs with a live per-user overlay
#[derive(Clone)]
pub struct GraphCacheGateway {
    store: Arc<dyn ConceptGraphStore>,
    builder: GraphCacheBuilder,
    limits: BuildLimits,
}

impl GraphCacheGateway {
    pub fn new(store: Arc<dyn ConceptGraphStore>, limits: BuildLimits) -> Self {
        Self {
            builder: GraphCacheBuilder::new(store.clone()),
            store,
            limits,
        }
    }

    /// The article's context graph with `is_collected` set for `user`.
    ///
    /// Unknown articles and unreadable caches both yield the empty graph.
    pub fn article_context(&self, article: ArticleId, user: UserId) -> StorageResult<Graph> {
        let mut graph = match self.cached_or_build(article)? {
            Some(graph) => graph,
            None => return Ok(Graph::empty()),
        };

        let collected = self.store.collected_concept_ids(user)?;
        for node in &mut graph.nodes {
            node.is_collected = collected.contains(&node.id);
        }
        Ok(graph)
    }

    /// Build and persist the article's cache if it has none.
    ///
    /// Returns true when this call wrote the cache.
    pub fn warm(&self, article: ArticleId) -> StorageResult<bool> {
        match self.store.load_article(article)? {
            Some(a) if a.graph_cache.as_deref().is_some_and(|c| !c.is_empty()) => Ok(false),
            Some(_) => self.build_and_store(article).map(|(_, written)| written),
            None => Ok(false),
        }
    }

    /// `None` when the article does not exist
    fn cached_or_build(&self, article: ArticleId) -> StorageResult<Option<Graph>> {
        let Some(record) = self.store.load_article(article)? else {
            return Ok(None);
        };

        match record.graph_cache.as_deref() {
            None | Some("") => self.build_and_store(article).map(|(graph, _)| Some(graph)),
            Some(text) => match Graph::from_json(text) {
                Ok(graph) => Ok(Some(graph)),
                Err(e) => {
                    warn!(article = %article, error = %e, "malformed graph cache, serving empty graph");
                    Ok(Some(Graph::empty()))
                }
            },
        }
    }

    fn build_and_store(&self, article: ArticleId) -> StorageResult<(Graph, bool)> {
        let graph = self.builder.build(article, self.limits)?;
        let written = self.store.save_graph_cache(article, &graph.to_json()?)?;
        if written {
            debug!(article = %article, nodes = graph.nodes.len(), "stored graph cache");
        } else {
            debug!(article = %article, "graph cache already written by another reader");
        }
        Ok((graph, written))
    }
}
