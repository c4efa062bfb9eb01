//! Checkout session handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// Create checkout session request.
///
/// Both fields are optional at the wire level so a missing field is reported
/// as a validation error rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct CreateCheckoutSessionRequest {
    /// Line item display name.
    pub product_name: Option<String>,
    /// Amount in minor currency units (e.g. 5000 = 50.00).
    pub amount: Option<i64>,
}

/// Create checkout session response.
#[derive(Debug, Serialize)]
pub struct CreateCheckoutSessionResponse {
    /// Hosted checkout page to redirect the customer to.
    pub url: String,
    /// Gateway session ID.
    pub session_id: String,
}

/// Open a hosted checkout session and record a pending deposit.
pub async fn create_checkout_session(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateCheckoutSessionRequest>, JsonRejection>,
) -> Result<Json<CreateCheckoutSessionResponse>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::Validation(e.body_text()))?;

    let product_name = body
        .product_name
        .ok_or_else(|| ApiError::Validation("product_name is required".into()))?;
    let amount = body
        .amount
        .ok_or_else(|| ApiError::Validation("amount is required".into()))?;

    let created = state
        .initiator
        .create_session(&product_name, amount)
        .await?;

    Ok(Json(CreateCheckoutSessionResponse {
        url: created.redirect_url,
        session_id: created.session_id,
    }))
}
