//! Blogstore Storage - key-value store adapter for the blog repository
//!
//! This crate provides the store capability the repository is written
//! against, with two backends:
//! - In-memory (for testing, with failure injection)
//! - redb (persistent embedded database)
//!
//! ## Capabilities
//!
//! - Primary storage: opaque values per type tag, addressed by numeric id,
//!   with a monotonic id sequence per type tag
//! - Ordered lists with prepend and inclusive-range trim
//! - String sets
//! - Score-ranked sets with increment and top-n
//! - Transactions: queued [`StoreOp`]s applied all-or-nothing on commit
//!
//! Values are byte strings; encoding is the caller's concern. Index key
//! names live in [`keys`].

mod error;
pub mod keys;
mod memory;
mod provider;
mod redb_storage;
mod structures;

pub use error::{Result, StorageError};
pub use memory::InMemoryStore;
pub use provider::{KeyValueStore, StoreOp, Transaction};
pub use redb_storage::RedbStore;
