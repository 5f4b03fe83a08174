//! Blogstore - blog entities over a key-value store with derived indexes
//!
//! This is the root workspace crate that provides integration tests.
//! The actual implementation is in the workspace member crates.

// Re-export main crates for convenience
pub use blogstore_model as model;
pub use blogstore_repository as repository;
pub use blogstore_storage as storage;

pub use blogstore_model::{Blog, BlogPost, BlogPostComment, User};
pub use blogstore_repository::{BlogRepository, IndexConsistency, RepositoryConfig, RepositoryError};
pub use blogstore_storage::{InMemoryStore, KeyValueStore, RedbStore};
