//! Request and response types for the deposit client.

use chrono::{DateTime, Utc};
use deposit_core::{Decimal, DepositId, DepositStatus};
use serde::{Deserialize, Serialize};

/// Create checkout session request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCheckoutSessionRequest {
    /// Line item display name.
    pub product_name: String,
    /// Amount in minor currency units.
    pub amount: i64,
}

/// Create checkout session response.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSessionResponse {
    /// Hosted checkout page to redirect the customer to.
    pub url: String,
    /// Gateway session ID.
    pub session_id: String,
}

/// A deposit as reported by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct DepositResponse {
    /// Deposit ID.
    pub id: DepositId,
    /// Amount in major units.
    pub amount: Decimal,
    /// Gateway session ID.
    pub session_id: String,
    /// Payment status.
    pub status: DepositStatus,
    /// Created timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Completion timestamp.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl DepositResponse {
    /// Whether the payment has been confirmed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == DepositStatus::Completed
    }
}

/// Error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Error message.
    pub error: String,
}
