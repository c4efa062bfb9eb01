//! Webhook handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;
use crate::stripe::SIGNATURE_HEADER;

/// Webhook acknowledgement.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Always `"success"`.
    pub status: &'static str,
}

/// Handle gateway webhooks.
///
/// The body is taken as raw bytes: the signature covers the exact payload.
pub async fn stripe_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, ApiError> {
    // Absent or non-ASCII header fails verification as MissingHeader.
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let outcome = state.reconciler.handle_event(&body, signature).await?;

    tracing::debug!(outcome = ?outcome, "Webhook handled");

    Ok(Json(WebhookResponse { status: "success" }))
}
