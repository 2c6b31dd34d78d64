use serde::{Serialize, Deserialize};
use thiserror::Error;
use crate::{codec::CodecError, store::StoreError, validation::ValidationError};

#[derive(Debug, Clone, Copy, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    #[error("Invalid input provided")]
    InvalidInput,
    #[error("Voter has already voted")]
    AlreadyVoted,
    #[error("Vote not found")]
    NotFound,
    #[error("Storage failure")]
    StorageFailure,
    #[error("Vote encoding failed")]
    EncodeError,
    #[error("Vote decoding failed")]
    DecodeError,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),
    #[error("voter {0} has already cast a vote")]
    AlreadyVoted(String),
    #[error("the vote for voter {0} does not exist")]
    NotFound(String),
    #[error("{context}")]
    Storage {
        context: &'static str,
        #[source]
        source: StoreError,
    },
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl LedgerError {
    pub(crate) fn storage(context: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Storage { context, source }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput(_) => ErrorCode::InvalidInput,
            Self::AlreadyVoted(_) => ErrorCode::AlreadyVoted,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Storage { .. } => ErrorCode::StorageFailure,
            Self::Codec(CodecError::Encode(_)) => ErrorCode::EncodeError,
            Self::Codec(CodecError::Decode(_)) => ErrorCode::DecodeError,
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
