//! Seams to the external payment gateway.
//!
//! The session initiator and webhook reconciler only talk to the gateway
//! through these traits, so tests can substitute fakes and the Stripe
//! specifics stay in [`crate::stripe`].

use std::time::Duration;

use async_trait::async_trait;

/// A single-line-item hosted checkout to open at the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
    /// Display name of the line item.
    pub product_name: String,
    /// Unit price in minor currency units.
    pub unit_amount: i64,
    /// Quantity of the line item. Always 1 for deposits.
    pub quantity: u32,
    /// ISO 4217 currency code, lowercase.
    pub currency: String,
    /// Where the gateway sends the customer after paying.
    pub success_url: String,
    /// Where the gateway sends the customer after abandoning checkout.
    pub cancel_url: String,
}

/// A session the gateway has created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySession {
    /// Gateway-issued session identifier.
    pub id: String,
    /// Hosted checkout page to redirect the customer to.
    pub url: String,
}

/// Failure to open a checkout session at the gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The gateway could not be reached.
    #[error("gateway request failed: {0}")]
    Transport(String),

    /// The gateway rejected the request (invalid request, auth failure, ...).
    #[error("{message}")]
    Rejected {
        /// Upstream error message.
        message: String,
        /// Upstream error code, if any.
        code: Option<String>,
    },

    /// The gateway answered with something we can't use.
    #[error("invalid gateway response: {0}")]
    InvalidResponse(String),

    /// The gateway didn't answer in time.
    #[error("gateway did not respond within {0:?}")]
    Timeout(Duration),
}

/// Creates hosted checkout sessions.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a hosted checkout session.
    ///
    /// # Errors
    ///
    /// Returns a `GatewayError` if the gateway fails or rejects the request.
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<GatewaySession, GatewayError>;
}

/// Why a webhook signature was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// No signature header was sent.
    #[error("missing signature header")]
    MissingHeader,

    /// The header carried no usable timestamp.
    #[error("missing or invalid timestamp")]
    MissingTimestamp,

    /// The header carried no signature for the supported scheme.
    #[error("no v1 signature found")]
    NoSignatures,

    /// The signed timestamp is too far from the current time.
    #[error("timestamp {timestamp} outside tolerance of {tolerance_seconds}s")]
    OutsideTolerance {
        /// Timestamp from the header.
        timestamp: i64,
        /// Allowed skew in seconds.
        tolerance_seconds: u64,
    },

    /// No signature matched the payload.
    #[error("signature mismatch")]
    Mismatch,
}

/// Verifies that a webhook payload was signed by the gateway.
pub trait WebhookVerifier: Send + Sync {
    /// Check `signature_header` against the raw `payload` bytes.
    ///
    /// # Errors
    ///
    /// Returns the reason the signature was rejected.
    fn verify(&self, payload: &[u8], signature_header: &str) -> Result<(), SignatureError>;
}
