//! API error handling
//!
//! Domain errors map onto HTTP statuses here and nowhere else:
//! validation 422, forbidden 403, invalid transition and conflict 409,
//! not found 404, transient storage trouble 503, everything else 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use core_kernel::StoreError;
use domain_ledger::LedgerError;
use domain_party::PartyError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Unauthorized".to_string(),
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::InvalidTransition(msg) => {
                (StatusCode::CONFLICT, "invalid_transition", msg.clone())
            }
            ApiError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg.clone())
            }
            ApiError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg.clone())
            }
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

fn from_store(error: StoreError) -> ApiError {
    if error.is_transient() {
        ApiError::Unavailable(error.to_string())
    } else if error.is_not_found() {
        ApiError::NotFound(error.to_string())
    } else {
        ApiError::Internal(error.to_string())
    }
}

impl From<LedgerError> for ApiError {
    fn from(error: LedgerError) -> Self {
        match error {
            LedgerError::Validation(msg) => ApiError::Validation(msg),
            LedgerError::Forbidden(msg) => ApiError::Forbidden(msg),
            LedgerError::InvalidTransition { .. } => {
                ApiError::InvalidTransition(error.to_string())
            }
            LedgerError::Conflict(msg) => ApiError::Conflict(msg),
            LedgerError::NotFound(msg) => ApiError::NotFound(msg),
            LedgerError::Money(e) => ApiError::Internal(e.to_string()),
            LedgerError::Store(e) => from_store(e),
        }
    }
}

impl From<PartyError> for ApiError {
    fn from(error: PartyError) -> Self {
        match error {
            PartyError::Validation(msg) => ApiError::Validation(msg),
            PartyError::Forbidden(msg) => ApiError::Forbidden(msg),
            PartyError::Conflict(msg) => ApiError::Conflict(msg),
            PartyError::NotFound(msg) => ApiError::NotFound(msg),
            PartyError::Store(e) => from_store(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_ledger::EntryStatus;

    #[test]
    fn test_ledger_error_mapping() {
        let error: ApiError = LedgerError::validation("too big").into();
        assert!(matches!(error, ApiError::Validation(_)));

        let error: ApiError =
            LedgerError::invalid_transition(EntryStatus::Approved, "approve").into();
        assert!(matches!(error, ApiError::InvalidTransition(_)));

        let error: ApiError = LedgerError::Store(StoreError::connection("refused")).into();
        assert!(matches!(error, ApiError::Unavailable(_)));
    }
}
