//! Error types for deposit domain logic.

use crate::ids::IdError;

/// Result type for deposit domain operations.
pub type Result<T> = std::result::Result<T, DepositError>;

/// Errors raised by domain validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DepositError {
    /// A checkout request failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// A stored status string is not a known status.
    #[error("invalid deposit status: {0}")]
    InvalidStatus(String),

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),
}
