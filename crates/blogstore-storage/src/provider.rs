//! Store capability trait and transaction interface

use crate::Result;
use std::collections::BTreeSet;

/// A mutation that can be applied directly or queued in a [`Transaction`]
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOp {
    /// Upsert a value by type tag and id
    Put {
        type_tag: String,
        id: u64,
        value: Vec<u8>,
    },
    /// Push a value onto the front of a list
    ListPrepend { key: String, value: Vec<u8> },
    /// Keep only positions `start..=end` of a list
    ListTrim { key: String, start: usize, end: usize },
    /// Add a member to a set
    SetAdd { key: String, member: String },
    /// Add `delta` to a member's score in a ranked set
    SortedSetIncrement {
        key: String,
        member: String,
        delta: f64,
    },
}

impl StoreOp {
    pub fn put(type_tag: &str, id: u64, value: Vec<u8>) -> Self {
        Self::Put {
            type_tag: type_tag.to_string(),
            id,
            value,
        }
    }

    pub fn list_prepend(key: &str, value: Vec<u8>) -> Self {
        Self::ListPrepend {
            key: key.to_string(),
            value,
        }
    }

    pub fn list_trim(key: &str, start: usize, end: usize) -> Self {
        Self::ListTrim {
            key: key.to_string(),
            start,
            end,
        }
    }

    pub fn set_add(key: &str, member: impl Into<String>) -> Self {
        Self::SetAdd {
            key: key.to_string(),
            member: member.into(),
        }
    }

    pub fn sorted_set_increment(key: &str, member: impl Into<String>, delta: f64) -> Self {
        Self::SortedSetIncrement {
            key: key.to_string(),
            member: member.into(),
            delta,
        }
    }
}

/// Key-value store capability
///
/// Implementations must provide:
/// - Primary storage: per-type values by id, plus an atomic id sequence
/// - Indexes: ordered lists, sets, ranked sets
/// - Transactions: queued operations become visible together or not at all
///
/// All methods take `&self`; implementations do their own locking.
pub trait KeyValueStore: Send + Sync {
    // ========== Primary Storage ==========

    /// Next id for `type_tag`. Starts at 1, never repeats.
    fn next_id(&self, type_tag: &str) -> Result<u64>;

    /// Store a value (insert or update)
    fn put(&self, type_tag: &str, id: u64, value: &[u8]) -> Result<()>;

    /// Store several values as one unit
    fn put_all(&self, type_tag: &str, entries: &[(u64, Vec<u8>)]) -> Result<()> {
        let mut txn = self.begin_transaction()?;
        for (id, value) in entries {
            txn.queue(StoreOp::put(type_tag, *id, value.clone()));
        }
        txn.commit()
    }

    /// Get a value by id, failing with `NotFound` on a miss
    fn get_by_id(&self, type_tag: &str, id: u64) -> Result<Vec<u8>>;

    /// Get values for `ids` in request order. Missing ids are skipped.
    fn get_by_ids(&self, type_tag: &str, ids: &[u64]) -> Result<Vec<Vec<u8>>>;

    /// Every value stored under `type_tag`
    fn get_all(&self, type_tag: &str) -> Result<Vec<Vec<u8>>>;

    // ========== Lists ==========

    fn list_prepend(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Keep positions `start..=end`. Out-of-range bounds clamp.
    fn list_trim(&self, key: &str, start: usize, end: usize) -> Result<()>;

    /// Whole list, most recently prepended first
    fn list_get_all(&self, key: &str) -> Result<Vec<Vec<u8>>>;

    // ========== Sets ==========

    /// Returns `true` if the member was not already present
    fn set_add(&self, key: &str, member: &str) -> Result<bool>;

    fn set_get_all(&self, key: &str) -> Result<BTreeSet<String>>;

    // ========== Ranked Sets ==========

    /// Returns the member's new score
    fn sorted_set_increment(&self, key: &str, member: &str, delta: f64) -> Result<f64>;

    /// Highest `n` members by score, ties by member name ascending
    fn sorted_set_top_n(&self, key: &str, n: usize) -> Result<Vec<(String, f64)>>;

    // ========== Transactions ==========

    /// Begin a transaction for atomic multi-operation updates
    ///
    /// Dropping the handle without committing discards the queued operations.
    fn begin_transaction(&self) -> Result<Box<dyn Transaction + '_>>;

    /// Apply a single operation outside any transaction
    fn apply(&self, op: StoreOp) -> Result<()> {
        match op {
            StoreOp::Put {
                type_tag,
                id,
                value,
            } => self.put(&type_tag, id, &value),
            StoreOp::ListPrepend { key, value } => self.list_prepend(&key, &value),
            StoreOp::ListTrim { key, start, end } => self.list_trim(&key, start, end),
            StoreOp::SetAdd { key, member } => self.set_add(&key, &member).map(|_| ()),
            StoreOp::SortedSetIncrement { key, member, delta } => {
                self.sorted_set_increment(&key, &member, delta).map(|_| ())
            }
        }
    }
}

/// Transaction interface for atomic multi-operation updates
pub trait Transaction {
    /// Queue an operation; nothing is visible until commit
    fn queue(&mut self, op: StoreOp);

    /// Number of queued operations
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply every queued operation atomically
    fn commit(self: Box<Self>) -> Result<()>;

    /// Discard all queued operations
    fn rollback(self: Box<Self>) -> Result<()>;
}
