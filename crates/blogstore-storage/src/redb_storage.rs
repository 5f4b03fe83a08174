//! redb-based persistent storage implementation

use crate::structures::{self, List, Ranking};
use crate::{KeyValueStore, Result, StorageError, StoreOp, Transaction};
use redb::{Database, ReadableTable, TableDefinition, WriteTransaction};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

// Table definitions
const OBJECTS_TABLE: TableDefinition<(&str, u64), &[u8]> = TableDefinition::new("objects");
const SEQUENCES_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequences");
const LISTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("lists");
const SETS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("sets");
const RANKINGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("rankings");

/// redb-based persistent storage
///
/// All data lives in a single `.redb` file. Lists, sets and rankings are
/// stored as one bincode-encoded value per key. Every call runs in its own
/// redb transaction; a [`Transaction`] commit runs all of its queued
/// operations inside one redb write transaction.
pub struct RedbStore {
    db: Database,
    path: PathBuf,
}

impl RedbStore {
    /// Create or open a redb store at the given path
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(&path)?;

        // Initialize tables
        let write_txn = db.begin_write()?;
        {
            write_txn.open_table(OBJECTS_TABLE)?;
            write_txn.open_table(SEQUENCES_TABLE)?;
            write_txn.open_table(LISTS_TABLE)?;
            write_txn.open_table(SETS_TABLE)?;
            write_txn.open_table(RANKINGS_TABLE)?;
        }
        write_txn.commit()?;

        debug!(path = %path.display(), "opened redb store");
        Ok(Self { db, path })
    }

    /// Get the file path of this storage
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` in a write transaction and commit it
    ///
    /// If `f` fails the transaction is dropped, which aborts it.
    fn write<T>(&self, f: impl FnOnce(&WriteTransaction) -> Result<T>) -> Result<T> {
        let write_txn = self.db.begin_write()?;
        let value = f(&write_txn)?;
        write_txn.commit()?;
        Ok(value)
    }

    fn apply_batch(&self, operations: &[StoreOp]) -> Result<()> {
        self.write(|txn| {
            for op in operations {
                apply_in_txn(txn, op)?;
            }
            Ok(())
        })
    }

    fn read_encoded<T>(
        &self,
        table: TableDefinition<'static, &'static str, &'static [u8]>,
        key: &str,
    ) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table)?;
        load(&table, key)
    }
}

/// Decode the value at `key`, or the empty structure if absent
fn load<T, R>(table: &R, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
    R: ReadableTable<&'static str, &'static [u8]>,
{
    match table.get(key)? {
        Some(bytes) => Ok(bincode::deserialize(bytes.value())?),
        None => Ok(T::default()),
    }
}

fn save<T: Serialize>(
    table: &mut redb::Table<'_, &'static str, &'static [u8]>,
    key: &str,
    value: &T,
) -> Result<()> {
    let bytes = bincode::serialize(value)?;
    table.insert(key, bytes.as_slice())?;
    Ok(())
}

fn put_in_txn(txn: &WriteTransaction, type_tag: &str, id: u64, value: &[u8]) -> Result<()> {
    let mut table = txn.open_table(OBJECTS_TABLE)?;
    table.insert((type_tag, id), value)?;
    Ok(())
}

fn prepend_in_txn(txn: &WriteTransaction, key: &str, value: &[u8]) -> Result<()> {
    let mut table = txn.open_table(LISTS_TABLE)?;
    let mut list: List = load(&table, key)?;
    list.push_front(value.to_vec());
    save(&mut table, key, &list)
}

fn trim_in_txn(txn: &WriteTransaction, key: &str, start: usize, end: usize) -> Result<()> {
    let mut table = txn.open_table(LISTS_TABLE)?;
    if table.get(key)?.is_none() {
        return Ok(());
    }
    let mut list: List = load(&table, key)?;
    structures::trim(&mut list, start, end);
    save(&mut table, key, &list)
}

fn set_add_in_txn(txn: &WriteTransaction, key: &str, member: &str) -> Result<bool> {
    let mut table = txn.open_table(SETS_TABLE)?;
    let mut members: BTreeSet<String> = load(&table, key)?;
    let added = members.insert(member.to_string());
    if added {
        save(&mut table, key, &members)?;
    }
    Ok(added)
}

fn increment_in_txn(txn: &WriteTransaction, key: &str, member: &str, delta: f64) -> Result<f64> {
    let mut table = txn.open_table(RANKINGS_TABLE)?;
    let mut ranking: Ranking = load(&table, key)?;
    let score = structures::increment(&mut ranking, member, delta);
    save(&mut table, key, &ranking)?;
    Ok(score)
}

fn apply_in_txn(txn: &WriteTransaction, op: &StoreOp) -> Result<()> {
    match op {
        StoreOp::Put {
            type_tag,
            id,
            value,
        } => put_in_txn(txn, type_tag, *id, value),
        StoreOp::ListPrepend { key, value } => prepend_in_txn(txn, key, value),
        StoreOp::ListTrim { key, start, end } => trim_in_txn(txn, key, *start, *end),
        StoreOp::SetAdd { key, member } => set_add_in_txn(txn, key, member).map(|_| ()),
        StoreOp::SortedSetIncrement { key, member, delta } => {
            increment_in_txn(txn, key, member, *delta).map(|_| ())
        }
    }
}

impl KeyValueStore for RedbStore {
    fn next_id(&self, type_tag: &str) -> Result<u64> {
        self.write(|txn| {
            let mut table = txn.open_table(SEQUENCES_TABLE)?;
            let next = table.get(type_tag)?.map(|current| current.value()).unwrap_or(0) + 1;
            table.insert(type_tag, next)?;
            Ok(next)
        })
    }

    fn put(&self, type_tag: &str, id: u64, value: &[u8]) -> Result<()> {
        self.write(|txn| put_in_txn(txn, type_tag, id, value))
    }

    fn get_by_id(&self, type_tag: &str, id: u64) -> Result<Vec<u8>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(OBJECTS_TABLE)?;

        match table.get((type_tag, id))? {
            Some(bytes) => Ok(bytes.value().to_vec()),
            None => Err(StorageError::not_found(type_tag, id)),
        }
    }

    fn get_by_ids(&self, type_tag: &str, ids: &[u64]) -> Result<Vec<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(OBJECTS_TABLE)?;

        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(bytes) = table.get((type_tag, *id))? {
                results.push(bytes.value().to_vec());
            }
        }
        Ok(results)
    }

    fn get_all(&self, type_tag: &str) -> Result<Vec<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(OBJECTS_TABLE)?;

        let mut results = Vec::new();
        for entry in table.range((type_tag, 0u64)..=(type_tag, u64::MAX))? {
            let (_, value) = entry?;
            results.push(value.value().to_vec());
        }
        Ok(results)
    }

    fn list_prepend(&self, key: &str, value: &[u8]) -> Result<()> {
        self.write(|txn| prepend_in_txn(txn, key, value))
    }

    fn list_trim(&self, key: &str, start: usize, end: usize) -> Result<()> {
        self.write(|txn| trim_in_txn(txn, key, start, end))
    }

    fn list_get_all(&self, key: &str) -> Result<Vec<Vec<u8>>> {
        let list: List = self.read_encoded(LISTS_TABLE, key)?;
        Ok(list.into_iter().collect())
    }

    fn set_add(&self, key: &str, member: &str) -> Result<bool> {
        self.write(|txn| set_add_in_txn(txn, key, member))
    }

    fn set_get_all(&self, key: &str) -> Result<BTreeSet<String>> {
        self.read_encoded(SETS_TABLE, key)
    }

    fn sorted_set_increment(&self, key: &str, member: &str, delta: f64) -> Result<f64> {
        self.write(|txn| increment_in_txn(txn, key, member, delta))
    }

    fn sorted_set_top_n(&self, key: &str, n: usize) -> Result<Vec<(String, f64)>> {
        let ranking: Ranking = self.read_encoded(RANKINGS_TABLE, key)?;
        Ok(structures::top_n(&ranking, n))
    }

    fn begin_transaction(&self) -> Result<Box<dyn Transaction + '_>> {
        Ok(Box::new(RedbTransaction {
            storage: self,
            operations: Vec::new(),
        }))
    }
}

/// redb transaction
struct RedbTransaction<'a> {
    storage: &'a RedbStore,
    operations: Vec<StoreOp>,
}

impl<'a> Transaction for RedbTransaction<'a> {
    fn queue(&mut self, op: StoreOp) {
        self.operations.push(op);
    }

    fn len(&self) -> usize {
        self.operations.len()
    }

    fn commit(self: Box<Self>) -> Result<()> {
        // Apply all operations in a single database transaction
        let RedbTransaction {
            storage,
            operations,
        } = *self;
        match storage.apply_batch(&operations) {
            Ok(()) => {
                debug!(operations = operations.len(), "redb transaction committed");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "redb transaction rolled back");
                Err(StorageError::TransactionAborted(e.to_string()))
            }
        }
    }

    fn rollback(self: Box<Self>) -> Result<()> {
        // Simply drop self, discarding all operations
        Ok(())
    }
}
