//! Repository configuration

use crate::{RepositoryError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How index mutations relate to the primary write in
/// [`store_new_blog_posts`](crate::BlogRepository::store_new_blog_posts)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexConsistency {
    /// Feeds, tag ranking and category sets are written in the same
    /// transaction as the blog and its posts. An aborted commit leaves
    /// no trace anywhere.
    #[default]
    Atomic,
    /// Index mutations are applied directly before the blog and posts are
    /// committed. If that commit aborts, the indexes may already mention
    /// posts that were never stored.
    BestEffort,
}

/// Tunables for [`BlogRepository`](crate::BlogRepository)
///
/// ```toml
/// recent_feed_capacity = 5
/// index_consistency = "atomic"   # or "best-effort"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Entries kept in each recent-activity feed
    pub recent_feed_capacity: usize,
    pub index_consistency: IndexConsistency,
}

impl RepositoryConfig {
    pub const DEFAULT_FEED_CAPACITY: usize = 5;

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| RepositoryError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| RepositoryError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        if self.recent_feed_capacity == 0 {
            return Err(RepositoryError::Config(
                "recent_feed_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            recent_feed_capacity: Self::DEFAULT_FEED_CAPACITY,
            index_consistency: IndexConsistency::default(),
        }
    }
}
