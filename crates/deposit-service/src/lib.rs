//! Hosted-checkout deposits HTTP API service.
//!
//! This crate provides:
//!
//! - Checkout session creation backed by Stripe hosted Checkout
//! - Signed webhook reconciliation of completed payments
//! - Deposit lookup for the post-payment landing page
//!
//! The [`SessionInitiator`] and [`WebhookReconciler`] hold the flow logic and
//! talk to the gateway through the traits in [`gateway`]; the handlers are
//! thin adapters over them.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Health handler needs async for routing

pub mod config;
pub mod crypto;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod initiator;
pub mod reconciler;
pub mod routes;
pub mod state;
pub mod storage;
pub mod stripe;

pub use config::{ConfigError, ServiceConfig};
pub use error::ApiError;
pub use gateway::{
    CheckoutSessionRequest, GatewayError, GatewaySession, PaymentGateway, SignatureError,
    WebhookVerifier,
};
pub use initiator::{CheckoutSettings, CreatedSession, InitiateError, SessionInitiator};
pub use reconciler::{ReconcileError, Reconciliation, WebhookReconciler};
pub use routes::create_router;
pub use state::AppState;
pub use storage::{open_store, OpenStoreError};
pub use stripe::{StripeClient, StripeError, StripeSignatureVerifier};
