//! Persistent entities: articles, concepts, relations and collection entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest strength a stored relation may carry
pub const MIN_RELATION_STRENGTH: u8 = 1;

/// Highest strength a stored relation may carry
pub const MAX_RELATION_STRENGTH: u8 = 10;

/// Description stored for concepts created without one
pub const PLACEHOLDER_DESCRIPTION: &str = "No description available yet.";

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw row id
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// The raw row id
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

row_id!(
    /// Identifier of an article row
    ArticleId
);
row_id!(
    /// Identifier of a concept row
    ConceptId
);
row_id!(
    /// Identifier of a concept relation row
    RelationId
);
row_id!(
    /// Identifier of a collection entry row
    EntryId
);
row_id!(
    /// Identifier of a user. Users live outside this crate; only the id is stored.
    UserId
);

/// A news article with its lazily built context graph cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    /// Localized title produced by ingestion, if any
    pub title_localized: Option<String>,
    /// Source URL (unique across articles)
    pub original_url: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
    /// Serialized context graph. `None` until the first read builds it.
    #[serde(skip)]
    pub graph_cache: Option<String>,
}

impl Article {
    /// Title shown to readers: the localized title when present
    pub fn display_title(&self) -> &str {
        self.title_localized.as_deref().unwrap_or(&self.title)
    }
}

/// Fields needed to insert an article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    #[serde(default)]
    pub title_localized: Option<String>,
    pub original_url: String,
    pub summary: String,
}

impl NewArticle {
    pub fn new(title: impl Into<String>, original_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            title_localized: None,
            original_url: original_url.into(),
            summary: String::new(),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_localized_title(mut self, title: impl Into<String>) -> Self {
        self.title_localized = Some(title.into());
        self
    }
}

/// A technical concept extracted from articles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub id: ConceptId,
    /// Unique concept name
    pub name: String,
    pub description: String,
    /// Ordered real-world examples
    pub examples: Vec<String>,
}

/// Fields needed to insert a concept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConcept {
    pub name: String,
    pub description: String,
    pub examples: Vec<String>,
}

impl NewConcept {
    /// A concept with the placeholder description and no examples
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: PLACEHOLDER_DESCRIPTION.to_string(),
            examples: Vec::new(),
        }
    }

    /// Set the description. Blank text keeps the placeholder.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        if !description.trim().is_empty() {
            self.description = description;
        }
        self
    }

    pub fn with_examples(mut self, examples: Vec<String>) -> Self {
        self.examples = examples;
        self
    }
}

/// A directed, weighted relation between two concepts
///
/// Several rows may connect the same ordered pair; each is independent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptRelation {
    pub id: RelationId,
    pub from: ConceptId,
    pub to: ConceptId,
    pub relation_type: Option<String>,
    /// Strength in `1..=10`
    pub strength: u8,
}

/// Fields needed to insert a relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRelation {
    pub from: ConceptId,
    pub to: ConceptId,
    pub relation_type: Option<String>,
    pub strength: u8,
}

impl NewRelation {
    pub fn new(from: ConceptId, to: ConceptId, strength: u8) -> Self {
        Self {
            from,
            to,
            relation_type: None,
            strength,
        }
    }

    pub fn with_type(mut self, relation_type: impl Into<String>) -> Self {
        self.relation_type = Some(relation_type.into());
        self
    }
}

/// A user's bookmark of a concept, unique per (user, concept)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub concept_id: ConceptId,
    pub collected_at: DateTime<Utc>,
}

/// A collected concept joined with its collection timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedConcept {
    pub concept: Concept,
    pub entry_id: EntryId,
    pub collected_at: DateTime<Utc>,
}
