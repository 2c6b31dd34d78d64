//! The ordered key-value store the ledger is written against.
//!
//! The ledger never talks to a concrete database. It is handed something that
//! implements [`KeyValueStore`]: point reads and writes, an insert that refuses
//! to overwrite, and ordered range scans. Commit semantics (atomicity of a
//! single invocation, conflict detection between concurrent invocations) belong
//! to the implementation.
//!
//! [`MemoryStore`] is the in-process implementation. It backs the test suite
//! and any deployment that does not need durability.

use std::collections::BTreeMap;
use std::ops::{Bound, RangeBounds};
use std::sync::{Arc, RwLock};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to acquire store lock")]
    LockFailed,
    #[error("storage I/O error")]
    Io(#[from] std::io::Error),
    #[error("storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueEntry {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl KeyValueEntry {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}

/// A key range with an inclusive start and an exclusive end.
///
/// An empty start or end key means the range is unbounded on that side, so
/// `KeyRange::between("", "")` covers the whole key space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRange {
    start: Bound<Vec<u8>>,
    end: Bound<Vec<u8>>,
}

impl KeyRange {
    pub fn all() -> Self {
        Self { start: Bound::Unbounded, end: Bound::Unbounded }
    }

    pub fn between(start: impl Into<Vec<u8>>, end: impl Into<Vec<u8>>) -> Self {
        let (start, end) = (start.into(), end.into());
        Self {
            start: if start.is_empty() { Bound::Unbounded } else { Bound::Included(start) },
            end: if end.is_empty() { Bound::Unbounded } else { Bound::Excluded(end) },
        }
    }

    /// True when the start lies past the end, i.e. no key can match.
    pub fn is_inverted(&self) -> bool {
        match (&self.start, &self.end) {
            (Bound::Included(s), Bound::Excluded(e)) => s > e,
            _ => false,
        }
    }
}

impl RangeBounds<Vec<u8>> for KeyRange {
    fn start_bound(&self) -> Bound<&Vec<u8>> {
        self.start.as_ref()
    }

    fn end_bound(&self) -> Bound<&Vec<u8>> {
        self.end.as_ref()
    }
}

/// A cursor over entries in ascending key order.
///
/// Callers must call [`close`](StoreIterator::close) once they are done,
/// whether or not iteration succeeded. Implementations also release their
/// resources on drop.
pub trait StoreIterator {
    fn next_entry(&mut self) -> StoreResult<Option<KeyValueEntry>>;

    fn close(&mut self) -> StoreResult<()> {
        Ok(())
    }
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    fn put(&self, key: &[u8], value: Vec<u8>) -> StoreResult<()>;

    fn scan(&self, range: &KeyRange) -> StoreResult<Box<dyn StoreIterator + '_>>;

    /// Writes `value` only if nothing is stored under `key` yet. Returns
    /// whether the write happened.
    ///
    /// The default is a plain read followed by a write. It is only correct
    /// when the surrounding platform serializes transactions on the same key
    /// or rejects conflicting writes at commit time. Implementations that can
    /// do better must override it.
    fn put_if_absent(&self, key: &[u8], value: Vec<u8>) -> StoreResult<bool> {
        if self.get(key)?.is_some_and(|existing| !existing.is_empty()) {
            return Ok(false);
        }
        self.put(key, value)?;
        Ok(true)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &[u8], value: Vec<u8>) -> StoreResult<()> {
        (**self).put(key, value)
    }

    fn scan(&self, range: &KeyRange) -> StoreResult<Box<dyn StoreIterator + '_>> {
        (**self).scan(range)
    }

    fn put_if_absent(&self, key: &[u8], value: Vec<u8>) -> StoreResult<bool> {
        (**self).put_if_absent(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &[u8], value: Vec<u8>) -> StoreResult<()> {
        (**self).put(key, value)
    }

    fn scan(&self, range: &KeyRange) -> StoreResult<Box<dyn StoreIterator + '_>> {
        (**self).scan(range)
    }

    fn put_if_absent(&self, key: &[u8], value: Vec<u8>) -> StoreResult<bool> {
        (**self).put_if_absent(key, value)
    }
}

/// In-memory store backed by a `BTreeMap`, so scans come out in key order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = KeyValueEntry>) -> Self {
        let data = entries.into_iter().map(|e| (e.key, e.value)).collect();
        Self { data: RwLock::new(data) }
    }

    /// Copies out every entry in key order.
    pub fn entries(&self) -> StoreResult<Vec<KeyValueEntry>> {
        let data = self.data.read().map_err(|_| StoreError::LockFailed)?;
        Ok(data.iter().map(|(k, v)| KeyValueEntry::new(k.clone(), v.clone())).collect())
    }

    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.data.read().map_err(|_| StoreError::LockFailed)?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        let data = self.data.read().map_err(|_| StoreError::LockFailed)?;
        Ok(data.get(key).cloned())
    }

    fn put(&self, key: &[u8], value: Vec<u8>) -> StoreResult<()> {
        let mut data = self.data.write().map_err(|_| StoreError::LockFailed)?;
        data.insert(key.to_vec(), value);
        Ok(())
    }

    fn scan(&self, range: &KeyRange) -> StoreResult<Box<dyn StoreIterator + '_>> {
        if range.is_inverted() {
            return Ok(Box::new(MemoryIterator::new(Vec::new())));
        }
        let data = self.data.read().map_err(|_| StoreError::LockFailed)?;
        let entries = data
            .range::<Vec<u8>, _>(range.clone())
            .map(|(k, v)| KeyValueEntry::new(k.clone(), v.clone()))
            .collect();
        Ok(Box::new(MemoryIterator::new(entries)))
    }

    fn put_if_absent(&self, key: &[u8], value: Vec<u8>) -> StoreResult<bool> {
        let mut data = self.data.write().map_err(|_| StoreError::LockFailed)?;
        if data.get(key).is_some_and(|existing| !existing.is_empty()) {
            return Ok(false);
        }
        data.insert(key.to_vec(), value);
        Ok(true)
    }
}

/// Iterator over a copy of the entries taken when the scan was opened.
#[derive(Debug)]
pub struct MemoryIterator {
    entries: std::vec::IntoIter<KeyValueEntry>,
}

impl MemoryIterator {
    pub fn new(entries: Vec<KeyValueEntry>) -> Self {
        Self { entries: entries.into_iter() }
    }
}

impl StoreIterator for MemoryIterator {
    fn next_entry(&mut self) -> StoreResult<Option<KeyValueEntry>> {
        Ok(self.entries.next())
    }

    fn close(&mut self) -> StoreResult<()> {
        self.entries = Vec::new().into_iter();
        Ok(())
    }
}
