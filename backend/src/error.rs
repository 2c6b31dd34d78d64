use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::{Request, Response};
use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::{debug, error};
use ledger::{ErrorCode, LedgerError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl ErrorResponse {
    pub fn message(error: impl Into<String>) -> Self {
        Self { error: error.into(), code: None }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self.code() {
            Some(ErrorCode::InvalidInput) => Status::BadRequest,
            Some(ErrorCode::AlreadyVoted) => Status::Conflict,
            Some(ErrorCode::NotFound) => Status::NotFound,
            Some(ErrorCode::StorageFailure) => Status::ServiceUnavailable,
            Some(ErrorCode::EncodeError | ErrorCode::DecodeError) | None => Status::InternalServerError,
        }
    }

    /// The message followed by each underlying cause, `": "`-separated.
    pub fn detail(&self) -> String {
        let mut detail = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            detail.push_str(": ");
            detail.push_str(&cause.to_string());
            source = cause.source();
        }
        detail
    }

    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ApiError::Ledger(e) => Some(e.code()),
            ApiError::Internal(_) => None,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let status = self.status();
        let detail = self.detail();
        if status.code >= 500 {
            error!("{} {} failed: {}", req.method(), req.uri(), detail);
        } else {
            debug!("{} {} rejected: {}", req.method(), req.uri(), detail);
        }

        let body = Json(ErrorResponse { error: detail, code: self.code() });
        Response::build_from(body.respond_to(req)?)
            .status(status)
            .ok()
    }
}
