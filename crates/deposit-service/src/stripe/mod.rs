//! Stripe integration.
//!
//! Stripe handles:
//! - Hosted Checkout sessions for deposits
//! - Signed webhook delivery for payment events

pub mod client;
pub mod signature;
pub mod types;

pub use client::StripeClient;
pub use client::StripeError;
pub use signature::{StripeSignatureVerifier, SIGNATURE_HEADER};
pub use types::*;
