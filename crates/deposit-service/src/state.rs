//! Application state.

use std::sync::Arc;

use deposit_store::DepositStore;

use crate::config::ServiceConfig;
use crate::gateway::{PaymentGateway, WebhookVerifier};
use crate::initiator::{CheckoutSettings, SessionInitiator};
use crate::reconciler::WebhookReconciler;
use crate::stripe::StripeSignatureVerifier;

/// Shared application state.
pub struct AppState {
    /// Deposit store.
    pub store: Arc<dyn DepositStore>,
    /// Service configuration.
    pub config: ServiceConfig,
    /// Opens checkout sessions.
    pub initiator: SessionInitiator,
    /// Applies webhook events.
    pub reconciler: WebhookReconciler,
}

impl AppState {
    /// Create new application state.
    ///
    /// Webhooks are verified with the Stripe scheme using the configured
    /// signing secret and tolerance.
    #[must_use]
    pub fn new(
        store: Arc<dyn DepositStore>,
        gateway: Arc<dyn PaymentGateway>,
        config: ServiceConfig,
    ) -> Self {
        let verifier: Arc<dyn WebhookVerifier> = Arc::new(StripeSignatureVerifier::new(
            config.stripe_webhook_secret.clone(),
            config.webhook_tolerance(),
        ));
        Self::with_verifier(store, gateway, verifier, config)
    }

    /// Create application state with an explicit webhook verifier.
    #[must_use]
    pub fn with_verifier(
        store: Arc<dyn DepositStore>,
        gateway: Arc<dyn PaymentGateway>,
        verifier: Arc<dyn WebhookVerifier>,
        config: ServiceConfig,
    ) -> Self {
        let initiator = SessionInitiator::new(
            gateway,
            store.clone(),
            CheckoutSettings::from_config(&config),
        );
        let reconciler = WebhookReconciler::new(verifier, store.clone());

        Self {
            store,
            config,
            initiator,
            reconciler,
        }
    }
}
