//! Deposit lookup handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use deposit_core::Deposit;

use crate::error::ApiError;
use crate::state::AppState;

/// Deposit response.
#[derive(Debug, Serialize)]
pub struct DepositResponse {
    /// Deposit ID.
    pub id: String,
    /// Amount in major units, two decimal places (e.g. "50.00").
    pub amount: String,
    /// Gateway session ID.
    pub session_id: String,
    /// `pending` or `completed`.
    pub status: String,
    /// Created timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
    /// Completion timestamp.
    pub completed_at: Option<String>,
}

impl From<&Deposit> for DepositResponse {
    fn from(deposit: &Deposit) -> Self {
        Self {
            id: deposit.id.to_string(),
            amount: format!("{:.2}", deposit.amount),
            session_id: deposit.session_id.clone(),
            status: deposit.status.as_str().to_string(),
            created_at: deposit.created_at.to_rfc3339(),
            updated_at: deposit.updated_at.to_rfc3339(),
            completed_at: deposit.completed_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Look up the deposit for a gateway session.
pub async fn get_deposit(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<DepositResponse>, ApiError> {
    let deposit = state
        .store
        .find_by_session_id(&session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No deposit for session {session_id}")))?;

    Ok(Json(DepositResponse::from(&deposit)))
}
