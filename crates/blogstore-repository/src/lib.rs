//! Blogstore Repository - users, blogs, posts and their derived indexes
//!
//! [`BlogRepository`] stores entities in a [`KeyValueStore`] and keeps
//! these structures in step with every post write:
//! - recent-posts and recent-comments feeds, capped to the newest N
//! - a tag ranking counting every tag occurrence ever stored
//! - the set of all category names, and one post-id set per category
//!
//! How index writes relate to the primary write is chosen with
//! [`IndexConsistency`].
//!
//! [`KeyValueStore`]: blogstore_storage::KeyValueStore

mod codec;
mod config;
mod error;
mod repository;

pub use config::{IndexConsistency, RepositoryConfig};
pub use error::{RepositoryError, Result};
pub use repository::BlogRepository;
