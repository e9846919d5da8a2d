//! HTTP-facing error mapping.
//!
//! # Invariants
//! - Missing records map to 404.
//! - Record validation and malformed input map to 422.
//! - Storage and runtime failures map to 500 and are logged; their details
//!   never reach the response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gradebook_core::db::DbError;
use gradebook_core::{AssessmentId, RepoError};
use log::error;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Request-level failure returned by handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(AssessmentId),
    /// Input rejected before or by record validation.
    Validation(String),
    Storage(String),
    Internal(String),
}

/// JSON error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub code: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(_) => write!(f, "Assessment not found"),
            Self::Validation(message) => write!(f, "{message}"),
            Self::Storage(message) => write!(f, "storage error: {message}"),
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl Error for ApiError {}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::Validation(err.to_string()),
            other => Self::Storage(other.to_string()),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(value: DbError) -> Self {
        Self::Storage(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            Self::Storage(message) | Self::Internal(message) => {
                error!(
                    "event=request_failed module=http status=error code={} error={}",
                    self.code(),
                    message
                );
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = ErrorResponse {
            detail,
            code: self.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}
