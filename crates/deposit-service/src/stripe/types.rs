//! Stripe API types.

use serde::Deserialize;

/// Stripe Checkout session object.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Session ID.
    pub id: String,
    /// Checkout URL to redirect the user to.
    #[serde(default)]
    pub url: Option<String>,
    /// Payment status (`paid`, `unpaid`, `no_payment_required`).
    #[serde(default)]
    pub payment_status: Option<String>,
    /// Session status (`open`, `complete`, `expired`).
    #[serde(default)]
    pub status: Option<String>,
    /// Total amount in minor units.
    #[serde(default)]
    pub amount_total: Option<i64>,
    /// Currency.
    #[serde(default)]
    pub currency: Option<String>,
}

/// Stripe webhook event.
///
/// Every field is optional at the wire level: Stripe adds event types and
/// fields over time, and an event we can't use must still be acknowledged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WebhookEvent {
    /// Event ID.
    pub id: Option<String>,
    /// Event type (e.g., "checkout.session.completed").
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    /// Event data.
    pub data: WebhookEventData,
    /// Created timestamp (Unix).
    pub created: Option<i64>,
}

/// Webhook event data container.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WebhookEventData {
    /// The event object. Its shape depends on the event type.
    pub object: serde_json::Value,
}

impl WebhookEvent {
    /// The `id` of the event object, if it has a string one.
    #[must_use]
    pub fn object_id(&self) -> Option<&str> {
        self.data.object.get("id").and_then(serde_json::Value::as_str)
    }
}

/// Stripe API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    /// Error details.
    pub error: StripeErrorDetail,
}

/// Stripe error detail.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorDetail {
    /// Error type.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message.
    #[serde(default)]
    pub message: Option<String>,
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Parameter that caused the error.
    #[serde(default)]
    pub param: Option<String>,
}
