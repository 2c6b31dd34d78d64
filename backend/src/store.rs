//! File-backed [`KeyValueStore`] for deployments that must survive restarts.
//!
//! The whole key space lives in memory and is mirrored to a JSON snapshot.
//! A write is acknowledged only after the new snapshot has been synced and
//! renamed over the old one, so a failed write leaves both the file and the
//! in-memory view untouched.
//!
//! Every commit rewrites the full snapshot, so a write costs O(N) in the
//! number of stored votes and commits are serialized behind one lock. This
//! suits ledgers of up to a few tens of thousands of voters. Larger ledgers
//! want a store that appends per-write records instead.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Serialize, Deserialize};
use tracing::{debug, info};
use ledger::{KeyRange, KeyValueEntry, KeyValueStore, MemoryStore, StoreError, StoreIterator, StoreResult};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    entries: Vec<SnapshotEntry>,
}

/// Keys and values are arbitrary bytes, so both are stored base64-encoded.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotEntry {
    key: String,
    value: String,
}

pub struct SnapshotStore {
    path: PathBuf,
    state: MemoryStore,
    commit: Mutex<()>,
}

impl SnapshotStore {
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let entries = match fs::read(&path) {
            Ok(bytes) => decode_snapshot(&bytes)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        info!(path = %path.display(), records = entries.len(), "📂 Opened ledger snapshot");

        Ok(Self {
            path,
            state: MemoryStore::from_entries(entries),
            commit: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the next snapshot is written before it is renamed over
    /// [`path`](Self::path): the snapshot file name with `.tmp` appended.
    pub fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(OsString::from).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn commit(&self, key: &[u8], value: Vec<u8>, only_if_absent: bool) -> StoreResult<bool> {
        let _guard = self.commit.lock().map_err(|_| StoreError::LockFailed)?;

        if only_if_absent && self.state.get(key)?.is_some_and(|existing| !existing.is_empty()) {
            return Ok(false);
        }

        let mut entries = self.state.entries()?;
        match entries.binary_search_by(|e| e.key.as_slice().cmp(key)) {
            Ok(i) => entries[i].value = value.clone(),
            Err(i) => entries.insert(i, KeyValueEntry::new(key, value.clone())),
        }
        self.persist(&entries)?;
        self.state.put(key, value)?;

        debug!(records = entries.len(), "Snapshot committed");
        Ok(true)
    }

    fn persist(&self, entries: &[KeyValueEntry]) -> StoreResult<()> {
        let bytes = encode_snapshot(entries)?;
        let tmp = self.staging_path();

        let mut file = File::create(&tmp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)?;

        // The rename is only durable once the directory entry is synced.
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        File::open(dir)?.sync_all()?;
        Ok(())
    }
}

impl KeyValueStore for SnapshotStore {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        self.state.get(key)
    }

    fn put(&self, key: &[u8], value: Vec<u8>) -> StoreResult<()> {
        self.commit(key, value, false).map(|_| ())
    }

    fn scan(&self, range: &KeyRange) -> StoreResult<Box<dyn StoreIterator + '_>> {
        self.state.scan(range)
    }

    fn put_if_absent(&self, key: &[u8], value: Vec<u8>) -> StoreResult<bool> {
        self.commit(key, value, true)
    }
}

fn encode_snapshot(entries: &[KeyValueEntry]) -> StoreResult<Vec<u8>> {
    let snapshot = Snapshot {
        entries: entries.iter()
            .map(|e| SnapshotEntry { key: STANDARD.encode(&e.key), value: STANDARD.encode(&e.value) })
            .collect(),
    };
    serde_json::to_vec_pretty(&snapshot)
        .map_err(|e| StoreError::Backend(format!("failed to encode snapshot: {}", e)))
}

fn decode_snapshot(bytes: &[u8]) -> StoreResult<Vec<KeyValueEntry>> {
    let snapshot: Snapshot = serde_json::from_slice(bytes)
        .map_err(|e| StoreError::Backend(format!("corrupt snapshot: {}", e)))?;

    snapshot.entries.into_iter()
        .map(|e| {
            let key = STANDARD.decode(&e.key)
                .map_err(|err| StoreError::Backend(format!("corrupt snapshot key {:?}: {}", e.key, err)))?;
            let value = STANDARD.decode(&e.value)
                .map_err(|err| StoreError::Backend(format!("corrupt snapshot value for key {:?}: {}", e.key, err)))?;
            Ok(KeyValueEntry::new(key, value))
        })
        .collect()
}
