#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("voter Id cannot be empty")]
    EmptyVoterId,
    #[error("candidate name cannot be empty")]
    EmptyCandidate,
}

/// Trims the voter id used as the store key, rejecting blank input.
pub fn normalize_voter_id(voter_id: &str) -> Result<&str, ValidationError> {
    match voter_id.trim() {
        "" => Err(ValidationError::EmptyVoterId),
        trimmed => Ok(trimmed),
    }
}

pub fn normalize_candidate(candidate: &str) -> Result<&str, ValidationError> {
    match candidate.trim() {
        "" => Err(ValidationError::EmptyCandidate),
        trimmed => Ok(trimmed),
    }
}
