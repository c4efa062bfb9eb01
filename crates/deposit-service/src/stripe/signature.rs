//! Stripe webhook signature verification.
//!
//! Stripe sends a `Stripe-Signature` header of the form
//! `t=<unix timestamp>,v1=<hex hmac>[,v1=<hex hmac>...]`. The signature is
//! HMAC-SHA256 over `"<timestamp>." || raw body` keyed with the endpoint's
//! signing secret. Several `v1` entries appear while a secret is being rolled.

use std::time::Duration;

use crate::crypto::{constant_time_eq, hmac_sha256_hex};
use crate::gateway::{SignatureError, WebhookVerifier};

/// Name of the header carrying the signature.
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Default tolerance between the signed timestamp and the current time.
pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(300);

/// Verifies Stripe webhook signatures with a pre-shared signing secret.
#[derive(Clone)]
pub struct StripeSignatureVerifier {
    secret: String,
    tolerance: Duration,
}

impl std::fmt::Debug for StripeSignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeSignatureVerifier")
            .field("secret", &"<redacted>")
            .field("tolerance", &self.tolerance)
            .finish()
    }
}

impl StripeSignatureVerifier {
    /// Create a verifier. A zero `tolerance` disables the timestamp check.
    #[must_use]
    pub fn new(secret: impl Into<String>, tolerance: Duration) -> Self {
        Self {
            secret: secret.into(),
            tolerance,
        }
    }

    /// Verify `header` against `payload` as of the Unix time `now`.
    ///
    /// # Errors
    ///
    /// Returns the reason the signature was rejected.
    pub fn verify_at(&self, payload: &[u8], header: &str, now: i64) -> Result<(), SignatureError> {
        if header.trim().is_empty() {
            return Err(SignatureError::MissingHeader);
        }

        let mut timestamp: Option<&str> = None;
        let mut signatures: Vec<&str> = Vec::new();

        for part in header.split(',') {
            let mut kv = part.trim().splitn(2, '=');
            match (kv.next(), kv.next()) {
                (Some("t"), Some(ts)) => timestamp = Some(ts),
                (Some("v1"), Some(sig)) => signatures.push(sig),
                _ => {}
            }
        }

        let raw_timestamp = timestamp.ok_or(SignatureError::MissingTimestamp)?;
        let parsed: i64 = raw_timestamp
            .parse()
            .map_err(|_| SignatureError::MissingTimestamp)?;

        if signatures.is_empty() {
            return Err(SignatureError::NoSignatures);
        }

        let expected = hmac_sha256_hex(&self.secret, &[raw_timestamp.as_bytes(), b".", payload]);

        if !signatures.iter().any(|sig| constant_time_eq(&expected, sig)) {
            return Err(SignatureError::Mismatch);
        }

        let tolerance_seconds = self.tolerance.as_secs();
        if tolerance_seconds > 0 && now.abs_diff(parsed) > tolerance_seconds {
            return Err(SignatureError::OutsideTolerance {
                timestamp: parsed,
                tolerance_seconds,
            });
        }

        Ok(())
    }

    /// Build a valid signature header for `payload` signed at `timestamp`.
    ///
    /// Useful for replaying events against a local service.
    #[must_use]
    pub fn sign(&self, payload: &[u8], timestamp: i64) -> String {
        let ts = timestamp.to_string();
        let sig = hmac_sha256_hex(&self.secret, &[ts.as_bytes(), b".", payload]);
        format!("t={ts},v1={sig}")
    }
}

impl WebhookVerifier for StripeSignatureVerifier {
    fn verify(&self, payload: &[u8], signature_header: &str) -> Result<(), SignatureError> {
        self.verify_at(payload, signature_header, chrono::Utc::now().timestamp())
    }
}
