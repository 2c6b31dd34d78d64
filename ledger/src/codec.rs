use thiserror::Error;
use crate::models::Vote;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to marshal vote data")]
    Encode(#[source] serde_json::Error),
    #[error("failed to unmarshal vote data")]
    Decode(#[source] serde_json::Error),
}

/// Serializes a vote as compact JSON: `{"candidate":"..","voterID":".."}`.
pub fn encode(vote: &Vote) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(vote).map_err(CodecError::Encode)
}

pub fn decode(bytes: &[u8]) -> Result<Vote, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::Decode)
}
