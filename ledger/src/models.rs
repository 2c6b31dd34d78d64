use serde::{Serialize, Deserialize};
use std::collections::HashMap;

/// Candidate name to number of valid votes received.
pub type TallyResult = HashMap<String, u64>;

/// A single committed vote. Field order is part of the persisted format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Vote {
    pub candidate: String,
    #[serde(rename = "voterID")]
    pub voter_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastVoteRequest {
    #[serde(rename = "voterID")]
    pub voter_id: String,
    pub candidate: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TallyReport {
    pub counts: TallyResult,
    pub counted_records: u64,
    pub skipped_records: u64,
}

impl Vote {
    pub fn new(voter_id: impl Into<String>, candidate: impl Into<String>) -> Self {
        Self {
            candidate: candidate.into(),
            voter_id: voter_id.into(),
        }
    }
}

impl TallyReport {
    pub(crate) fn record(&mut self, vote: Vote) {
        *self.counts.entry(vote.candidate).or_insert(0) += 1;
        self.counted_records += 1;
    }

    pub(crate) fn skip(&mut self) {
        self.skipped_records += 1;
    }

    pub fn total_votes(&self) -> u64 {
        self.counted_records
    }

    pub fn into_counts(self) -> TallyResult {
        self.counts
    }
}
