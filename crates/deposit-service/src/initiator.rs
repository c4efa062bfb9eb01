//! Session initiator.
//!
//! Opens a hosted checkout session at the gateway and records a pending
//! deposit for it. The deposit is written only after the gateway has issued a
//! session id, so a failed or timed-out gateway call leaves no local state.

use std::sync::Arc;
use std::time::Duration;

use deposit_core::{CheckoutRequest, DepositError, DepositId, NewDeposit};
use deposit_store::{DepositStore, StoreError};

use crate::config::ServiceConfig;
use crate::gateway::{CheckoutSessionRequest, GatewayError, PaymentGateway};

/// Placeholder the gateway replaces with the session id in the success URL.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Server-side checkout settings. Never taken from the request.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    /// Line-item currency.
    pub currency: String,
    /// Redirect after payment.
    pub success_url: String,
    /// Redirect after cancellation.
    pub cancel_url: String,
    /// Upper bound for the gateway round-trip.
    pub gateway_timeout: Duration,
}

impl CheckoutSettings {
    /// Build settings from the service configuration.
    #[must_use]
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            currency: config.currency.clone(),
            success_url: config.success_url.clone(),
            cancel_url: config.cancel_url.clone(),
            gateway_timeout: config.gateway_timeout(),
        }
    }

    /// Success URL carrying the session id placeholder.
    #[must_use]
    pub fn success_url_with_session(&self) -> String {
        if self.success_url.contains(SESSION_ID_PLACEHOLDER) {
            return self.success_url.clone();
        }

        let separator = if self.success_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}session_id={SESSION_ID_PLACEHOLDER}",
            self.success_url
        )
    }
}

/// Result of a successful `create_session` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSession {
    /// Hosted checkout page to send the customer to.
    pub redirect_url: String,
    /// Gateway session identifier.
    pub session_id: String,
    /// The pending deposit recorded for the session.
    pub deposit_id: DepositId,
}

/// Errors from session creation.
#[derive(Debug, thiserror::Error)]
pub enum InitiateError {
    /// The request was malformed. No gateway call was made.
    #[error(transparent)]
    Validation(#[from] DepositError),

    /// The gateway failed. No deposit was recorded.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The gateway succeeded but the deposit could not be recorded.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Creates gateway sessions and their pending deposits.
#[derive(Clone)]
pub struct SessionInitiator {
    gateway: Arc<dyn PaymentGateway>,
    store: Arc<dyn DepositStore>,
    settings: CheckoutSettings,
}

impl SessionInitiator {
    /// Create an initiator.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        store: Arc<dyn DepositStore>,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            gateway,
            store,
            settings,
        }
    }

    /// Open a checkout session for `amount_minor` minor units of `product_name`.
    ///
    /// # Errors
    ///
    /// - `InitiateError::Validation` for an empty product name or a
    ///   non-positive amount.
    /// - `InitiateError::Gateway` if the gateway fails, rejects the request or
    ///   exceeds the configured timeout.
    /// - `InitiateError::Store` if the pending deposit cannot be written.
    pub async fn create_session(
        &self,
        product_name: &str,
        amount_minor: i64,
    ) -> Result<CreatedSession, InitiateError> {
        let checkout = CheckoutRequest::new(product_name, amount_minor)?;

        let request = CheckoutSessionRequest {
            product_name: checkout.product_name().to_string(),
            unit_amount: checkout.amount_minor(),
            quantity: 1,
            currency: self.settings.currency.clone(),
            success_url: self.settings.success_url_with_session(),
            cancel_url: self.settings.cancel_url.clone(),
        };

        let timeout = self.settings.gateway_timeout;
        let session = tokio::time::timeout(timeout, self.gateway.create_checkout_session(&request))
            .await
            .map_err(|_| GatewayError::Timeout(timeout))
            .and_then(|result| result)
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to create checkout session");
                e
            })?;

        let deposit_id = self
            .store
            .create(NewDeposit::for_session(&session.id, checkout.amount_minor()))
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    session_id = %session.id,
                    "Gateway session created but deposit could not be recorded"
                );
                e
            })?;

        tracing::info!(
            deposit_id = %deposit_id,
            session_id = %session.id,
            amount_minor = %checkout.amount_minor(),
            currency = %self.settings.currency,
            "Checkout session created"
        );

        Ok(CreatedSession {
            redirect_url: session.url,
            session_id: session.id,
            deposit_id,
        })
    }
}
