//! Caller-facing error kinds
//!
//! Not-found and duplicate conditions propagate as their own variants so a
//! transport can map them to distinct responses. Malformed caches and
//! missing relations never surface here; they degrade to smaller graphs.

use crate::graph::{ConceptId, UserId};
use crate::storage::StorageError;
use thiserror::Error;

/// Kind of record a lookup failed to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Article,
    Concept,
    /// A user's collection entry for a concept
    Collection,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::Article => write!(f, "article"),
            Resource::Concept => write!(f, "concept"),
            Resource::Collection => write!(f, "collected concept"),
        }
    }
}

/// Errors returned by conceptmap operations
#[derive(Debug, Error)]
pub enum ConceptMapError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: Resource, id: i64 },

    #[error("User {user_id} has already collected concept {concept_id}")]
    Duplicate {
        user_id: UserId,
        concept_id: ConceptId,
    },

    #[error("Storage error: {0}")]
    Storage(StorageError),
}

impl ConceptMapError {
    pub fn not_found(resource: Resource, id: impl Into<i64>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

impl From<StorageError> for ConceptMapError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::DuplicateCollection {
                user_id,
                concept_id,
            } => Self::Duplicate {
                user_id,
                concept_id,
            },
            other => Self::Storage(other),
        }
    }
}

/// Result type for conceptmap operations
pub type ConceptMapResult<T> = Result<T, ConceptMapError>;
