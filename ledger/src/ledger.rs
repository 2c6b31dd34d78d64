use tracing::{debug, info, warn};
use crate::{
    codec::{self, CodecError},
    error::{LedgerError, Result},
    models::{TallyReport, TallyResult, Vote},
    store::{KeyRange, KeyValueStore, StoreIterator},
    validation::{normalize_candidate, normalize_voter_id},
};

/// One-vote-per-voter ledger over an ordered key-value store.
///
/// Votes are keyed by the trimmed voter id. Nothing is cached between calls:
/// every operation reads the store again.
///
/// The uniqueness check in [`cast_vote`](VoteLedger::cast_vote) is a read
/// followed by [`KeyValueStore::put_if_absent`]. The read only gives an early
/// error; the store's insert decides. Stores that keep the default
/// `put_if_absent` rely on the platform serializing transactions per key.
#[derive(Debug, Clone)]
pub struct VoteLedger<S> {
    store: S,
}

impl<S: KeyValueStore> VoteLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Nothing to seed: the ledger starts empty.
    pub fn init_ledger(&self) -> Result<()> {
        info!("Vote ledger initialized");
        Ok(())
    }

    pub fn cast_vote(&self, voter_id: &str, candidate: &str) -> Result<Vote> {
        let voter_id = normalize_voter_id(voter_id)?;
        let candidate = normalize_candidate(candidate)?;

        if self.vote_exists(voter_id)? {
            return Err(LedgerError::AlreadyVoted(voter_id.to_string()));
        }

        let vote = Vote::new(voter_id, candidate);
        let bytes = codec::encode(&vote)?;

        let inserted = self
            .store
            .put_if_absent(voter_id.as_bytes(), bytes)
            .map_err(LedgerError::storage("failed to store vote"))?;
        if !inserted {
            debug!(voter_id, "Lost race for voter key");
            return Err(LedgerError::AlreadyVoted(voter_id.to_string()));
        }

        debug!(voter_id, candidate, "Vote recorded");
        Ok(vote)
    }

    /// True iff a non-empty value is stored under the voter's key. The value is
    /// not decoded. A blank id can never have voted.
    pub fn vote_exists(&self, voter_id: &str) -> Result<bool> {
        let voter_id = voter_id.trim();
        if voter_id.is_empty() {
            return Ok(false);
        }
        let stored = self
            .store
            .get(voter_id.as_bytes())
            .map_err(LedgerError::storage("failed to read from world state"))?;
        Ok(stored.is_some_and(|bytes| !bytes.is_empty()))
    }

    pub fn get_vote(&self, voter_id: &str) -> Result<Vote> {
        let voter_id = voter_id.trim();
        if voter_id.is_empty() {
            return Err(LedgerError::NotFound(voter_id.to_string()));
        }
        let bytes = self
            .store
            .get(voter_id.as_bytes())
            .map_err(LedgerError::storage("failed to read from world state"))?
            .filter(|bytes| !bytes.is_empty())
            .ok_or_else(|| LedgerError::NotFound(voter_id.to_string()))?;
        Ok(codec::decode(&bytes)?)
    }

    pub fn tally_votes(&self) -> Result<TallyResult> {
        self.tally_report().map(TallyReport::into_counts)
    }

    /// Scans the whole key space and counts every record that decodes as a
    /// vote. Records that fail to decode are logged and skipped.
    pub fn tally_report(&self) -> Result<TallyReport> {
        let mut iter = self
            .store
            .scan(&KeyRange::all())
            .map_err(LedgerError::storage("failed to read get state range"))?;

        let scanned = accumulate(iter.as_mut());
        let closed = iter
            .close()
            .map_err(LedgerError::storage("failed to close state iterator"));

        let report = scanned?;
        closed?;

        if report.skipped_records > 0 {
            warn!(
                skipped = report.skipped_records,
                counted = report.counted_records,
                "Tally skipped malformed vote records"
            );
        }
        Ok(report)
    }
}

fn accumulate<I: StoreIterator + ?Sized>(iter: &mut I) -> Result<TallyReport> {
    let mut report = TallyReport::default();
    while let Some(entry) = iter
        .next_entry()
        .map_err(LedgerError::storage("failed to iterate through results"))?
    {
        match codec::decode(&entry.value) {
            Ok(vote) => report.record(vote),
            Err(CodecError::Decode(source) | CodecError::Encode(source)) => {
                warn!(key = %String::from_utf8_lossy(&entry.key), error = %source, "Skipping malformed vote record");
                report.skip();
            }
        }
    }
    Ok(report)
}
