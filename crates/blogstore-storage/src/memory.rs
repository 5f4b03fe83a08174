//! In-memory storage implementation for testing

use crate::structures::{self, List, Ranking};
use crate::{KeyValueStore, Result, StorageError, StoreOp, Transaction};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// In-memory storage implementation
///
/// Fast, non-persistent storage primarily for testing.
/// All data is lost when the storage is dropped.
///
/// Failure injection: [`set_unavailable`](Self::set_unavailable) makes every
/// call fail as if the backend were unreachable, and
/// [`abort_next_commit`](Self::abort_next_commit) fails the next commit
/// without applying any of its operations.
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
    unavailable: AtomicBool,
    abort_next_commit: AtomicBool,
}

#[derive(Default)]
struct MemoryState {
    objects: HashMap<String, BTreeMap<u64, Vec<u8>>>,
    sequences: HashMap<String, u64>,
    lists: HashMap<String, List>,
    sets: HashMap<String, BTreeSet<String>>,
    rankings: HashMap<String, Ranking>,
}

impl MemoryState {
    fn put(&mut self, type_tag: &str, id: u64, value: Vec<u8>) {
        self.objects
            .entry(type_tag.to_string())
            .or_default()
            .insert(id, value);
    }

    fn list_prepend(&mut self, key: &str, value: Vec<u8>) {
        self.lists.entry(key.to_string()).or_default().push_front(value);
    }

    fn list_trim(&mut self, key: &str, start: usize, end: usize) {
        if let Some(list) = self.lists.get_mut(key) {
            structures::trim(list, start, end);
        }
    }

    fn set_add(&mut self, key: &str, member: String) -> bool {
        self.sets.entry(key.to_string()).or_default().insert(member)
    }

    fn increment(&mut self, key: &str, member: &str, delta: f64) -> f64 {
        let ranking = self.rankings.entry(key.to_string()).or_default();
        structures::increment(ranking, member, delta)
    }

    fn apply(&mut self, op: StoreOp) {
        match op {
            StoreOp::Put {
                type_tag,
                id,
                value,
            } => self.put(&type_tag, id, value),
            StoreOp::ListPrepend { key, value } => self.list_prepend(&key, value),
            StoreOp::ListTrim { key, start, end } => self.list_trim(&key, start, end),
            StoreOp::SetAdd { key, member } => {
                self.set_add(&key, member);
            }
            StoreOp::SortedSetIncrement { key, member, delta } => {
                self.increment(&key, &member, delta);
            }
        }
    }
}

impl InMemoryStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
            unavailable: AtomicBool::new(false),
            abort_next_commit: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail with [`StorageError::Unavailable`]
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Fail the next transaction commit with [`StorageError::TransactionAborted`]
    pub fn abort_next_commit(&self) {
        self.abort_next_commit.store(true, Ordering::SeqCst);
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>> {
        self.check_available()?;
        self.state.read().map_err(|_| StorageError::poisoned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>> {
        self.check_available()?;
        self.state.write().map_err(|_| StorageError::poisoned())
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for InMemoryStore {
    fn next_id(&self, type_tag: &str) -> Result<u64> {
        let mut state = self.write()?;
        let seq = state.sequences.entry(type_tag.to_string()).or_insert(0);
        *seq += 1;
        Ok(*seq)
    }

    fn put(&self, type_tag: &str, id: u64, value: &[u8]) -> Result<()> {
        self.write()?.put(type_tag, id, value.to_vec());
        Ok(())
    }

    fn get_by_id(&self, type_tag: &str, id: u64) -> Result<Vec<u8>> {
        self.read()?
            .objects
            .get(type_tag)
            .and_then(|objects| objects.get(&id))
            .cloned()
            .ok_or_else(|| StorageError::not_found(type_tag, id))
    }

    fn get_by_ids(&self, type_tag: &str, ids: &[u64]) -> Result<Vec<Vec<u8>>> {
        let state = self.read()?;
        let Some(objects) = state.objects.get(type_tag) else {
            return Ok(Vec::new());
        };
        Ok(ids.iter().filter_map(|id| objects.get(id).cloned()).collect())
    }

    fn get_all(&self, type_tag: &str) -> Result<Vec<Vec<u8>>> {
        let state = self.read()?;
        Ok(state
            .objects
            .get(type_tag)
            .map(|objects| objects.values().cloned().collect())
            .unwrap_or_default())
    }

    fn list_prepend(&self, key: &str, value: &[u8]) -> Result<()> {
        self.write()?.list_prepend(key, value.to_vec());
        Ok(())
    }

    fn list_trim(&self, key: &str, start: usize, end: usize) -> Result<()> {
        self.write()?.list_trim(key, start, end);
        Ok(())
    }

    fn list_get_all(&self, key: &str) -> Result<Vec<Vec<u8>>> {
        let state = self.read()?;
        Ok(state
            .lists
            .get(key)
            .map(|list| list.iter().cloned().collect())
            .unwrap_or_default())
    }

    fn set_add(&self, key: &str, member: &str) -> Result<bool> {
        Ok(self.write()?.set_add(key, member.to_string()))
    }

    fn set_get_all(&self, key: &str) -> Result<BTreeSet<String>> {
        Ok(self.read()?.sets.get(key).cloned().unwrap_or_default())
    }

    fn sorted_set_increment(&self, key: &str, member: &str, delta: f64) -> Result<f64> {
        Ok(self.write()?.increment(key, member, delta))
    }

    fn sorted_set_top_n(&self, key: &str, n: usize) -> Result<Vec<(String, f64)>> {
        let state = self.read()?;
        Ok(state
            .rankings
            .get(key)
            .map(|ranking| structures::top_n(ranking, n))
            .unwrap_or_default())
    }

    fn begin_transaction(&self) -> Result<Box<dyn Transaction + '_>> {
        self.check_available()?;
        Ok(Box::new(InMemoryTransaction {
            storage: self,
            operations: Vec::new(),
        }))
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("unavailable", &self.unavailable.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// In-memory transaction
struct InMemoryTransaction<'a> {
    storage: &'a InMemoryStore,
    operations: Vec<StoreOp>,
}

impl<'a> Transaction for InMemoryTransaction<'a> {
    fn queue(&mut self, op: StoreOp) {
        self.operations.push(op);
    }

    fn len(&self) -> usize {
        self.operations.len()
    }

    fn commit(self: Box<Self>) -> Result<()> {
        let InMemoryTransaction {
            storage,
            operations,
        } = *self;
        if storage.abort_next_commit.swap(false, Ordering::SeqCst) {
            return Err(StorageError::TransactionAborted(
                "commit aborted by failure injection".to_string(),
            ));
        }

        // One write lock for the whole batch: readers see all or nothing
        let mut state = storage.write()?;
        let count = operations.len();
        for op in operations {
            state.apply(op);
        }
        debug!(operations = count, "in-memory transaction committed");
        Ok(())
    }

    fn rollback(self: Box<Self>) -> Result<()> {
        // Simply drop self, discarding all operations
        Ok(())
    }
}
