use std::path::PathBuf;
use std::sync::Arc;
use shuttle_runtime::SecretStore;
use tracing::warn;
use ledger::{MemoryStore, StoreError};
use crate::{routes::SharedStore, store::SnapshotStore};

pub const SNAPSHOT_PATH_SECRET: &str = "LEDGER_SNAPSHOT_PATH";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSettings {
    pub snapshot_path: Option<PathBuf>,
}

impl LedgerSettings {
    pub fn from_secrets(secrets: &SecretStore) -> Self {
        Self::from_lookup(|key| secrets.get(key))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let snapshot_path = lookup(SNAPSHOT_PATH_SECRET)
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        Self { snapshot_path }
    }

    pub fn open_store(&self) -> Result<SharedStore, StoreError> {
        match &self.snapshot_path {
            Some(path) => Ok(Arc::new(SnapshotStore::open(path)?)),
            None => {
                warn!("{} not found - votes will be kept in memory only", SNAPSHOT_PATH_SECRET);
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }
}
