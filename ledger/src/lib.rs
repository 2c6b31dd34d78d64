pub mod codec;
pub mod error;
pub mod ledger;
pub mod models;
pub mod store;
pub mod validation;

pub use error::{ErrorCode, LedgerError, Result};
pub use ledger::VoteLedger;
pub use models::*;
pub use store::{KeyRange, KeyValueEntry, KeyValueStore, MemoryIterator, MemoryStore, StoreError, StoreIterator, StoreResult};
pub use validation::*;
