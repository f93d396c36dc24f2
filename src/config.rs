//! Tunable thresholds for graph construction and discovery
//!
//! Settings load from a YAML file; any key left out takes its default.
//!
//! ```yaml
//! min_strength: 3
//! max_secondary_nodes: 15
//! discovery_threshold: 3
//! strong_connection_threshold: 6
//! ```

use crate::graph::{MAX_RELATION_STRENGTH, MIN_RELATION_STRENGTH};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Thresholds shared by every component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphSettings {
    /// Weakest relation an article context graph follows
    pub min_strength: u8,
    /// Cap on non-primary nodes in an article context graph
    pub max_secondary_nodes: usize,
    /// Weakest relation reported as a new connection on collect
    pub discovery_threshold: u8,
    /// Strength from which a knowledge-map edge counts as strong
    pub strong_connection_threshold: u8,
    /// Related articles listed on a concept detail
    pub related_article_limit: usize,
    /// Default result count for concept search
    pub search_limit: usize,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            min_strength: 3,
            max_secondary_nodes: 15,
            discovery_threshold: 3,
            strong_connection_threshold: 6,
            related_article_limit: 5,
            search_limit: 10,
        }
    }
}

impl GraphSettings {
    /// Parse settings from YAML text and validate them
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        // An empty document means "all defaults"
        let settings: Self = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(text)?
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_strength("min_strength", self.min_strength)?;
        check_strength("discovery_threshold", self.discovery_threshold)?;
        check_strength("strong_connection_threshold", self.strong_connection_threshold)?;
        if self.search_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "search_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn check_strength(field: &'static str, value: u8) -> Result<(), ConfigError> {
    if (MIN_RELATION_STRENGTH..=MAX_RELATION_STRENGTH).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!(
                "{} is outside {}..={}",
                value, MIN_RELATION_STRENGTH, MAX_RELATION_STRENGTH
            ),
        })
    }
}
