//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use deposit_core::DepositError;
use deposit_store::StoreError;

use crate::initiator::InitiateError;
use crate::reconciler::ReconcileError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    Validation(String),

    /// Webhook signature did not verify.
    #[error("invalid signature")]
    InvalidSignature,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The payment gateway failed or rejected the request.
    #[error("gateway error: {0}")]
    Gateway(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::InvalidSignature => (StatusCode::BAD_REQUEST, "Invalid Signature".to_string()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Gateway(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound("Deposit not found".into()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<InitiateError> for ApiError {
    fn from(err: InitiateError) -> Self {
        match err {
            InitiateError::Validation(DepositError::Validation(msg)) => Self::Validation(msg),
            InitiateError::Validation(e) => Self::Validation(e.to_string()),
            InitiateError::Gateway(e) => Self::Gateway(e.to_string()),
            InitiateError::Store(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<ReconcileError> for ApiError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::InvalidSignature(_) => Self::InvalidSignature,
            ReconcileError::Store(e) => Self::Internal(e.to_string()),
        }
    }
}
