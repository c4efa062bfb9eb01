//! Webhook reconciler.
//!
//! Turns verified gateway notifications into deposit state transitions. The
//! raw body is authenticated before it is parsed, and only
//! `checkout.session.completed` changes anything. Every verified delivery is
//! acknowledged, whatever its shape, so the gateway never retries one.

use std::sync::Arc;

use deposit_core::DepositId;
use deposit_store::{DepositStore, StoreError};

use crate::gateway::{SignatureError, WebhookVerifier};
use crate::stripe::WebhookEvent;

/// The only event type that mutates state.
pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

/// What a verified event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// The deposit moved from pending to completed.
    Completed {
        /// The deposit that was completed.
        deposit_id: DepositId,
        /// Gateway session id.
        session_id: String,
    },

    /// The deposit was already completed (redelivery).
    AlreadyCompleted {
        /// The deposit.
        deposit_id: DepositId,
        /// Gateway session id.
        session_id: String,
    },

    /// No deposit matches the session.
    UnknownSession {
        /// Gateway session id from the event.
        session_id: String,
    },

    /// The event type is not one we act on.
    Ignored {
        /// Event type from the payload.
        event_type: String,
    },

    /// The payload verified but could not be used: not an event, no type,
    /// or a completion event without a session id.
    Unrecognized {
        /// What was wrong with it.
        reason: String,
    },
}

/// Errors from webhook handling.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The signature did not verify. Nothing was parsed or mutated.
    #[error("invalid signature: {0}")]
    InvalidSignature(#[from] SignatureError),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Applies gateway webhook events to the deposit store.
#[derive(Clone)]
pub struct WebhookReconciler {
    verifier: Arc<dyn WebhookVerifier>,
    store: Arc<dyn DepositStore>,
}

impl WebhookReconciler {
    /// Create a reconciler.
    #[must_use]
    pub fn new(verifier: Arc<dyn WebhookVerifier>, store: Arc<dyn DepositStore>) -> Self {
        Self { verifier, store }
    }

    /// Verify and apply one webhook delivery.
    ///
    /// Safe to call any number of times with the same event: the completion
    /// transition is performed at most once.
    ///
    /// # Errors
    ///
    /// - `ReconcileError::InvalidSignature` if verification fails.
    /// - `ReconcileError::Store` if the store fails.
    pub async fn handle_event(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<Reconciliation, ReconcileError> {
        if let Err(e) = self.verifier.verify(payload, signature_header) {
            tracing::warn!(error = %e, "Rejected webhook with invalid signature");
            return Err(e.into());
        }

        let event: WebhookEvent = match serde_json::from_slice(payload) {
            Ok(event) => event,
            Err(e) => return Ok(unrecognized(format!("not an event: {e}"))),
        };

        let Some(event_type) = event.event_type.clone() else {
            return Ok(unrecognized("event has no type".into()));
        };

        tracing::info!(
            event_id = ?event.id,
            event_type = %event_type,
            "Received webhook"
        );

        if event_type != CHECKOUT_SESSION_COMPLETED {
            tracing::debug!(event_type = %event_type, "Ignoring webhook event");
            return Ok(Reconciliation::Ignored { event_type });
        }

        let Some(session_id) = event.object_id() else {
            return Ok(unrecognized(format!(
                "{CHECKOUT_SESSION_COMPLETED} event without a session id"
            )));
        };

        self.complete_session(session_id.to_string()).await
    }

    async fn complete_session(&self, session_id: String) -> Result<Reconciliation, ReconcileError> {
        let Some(deposit) = self.store.find_by_session_id(&session_id).await? else {
            tracing::warn!(session_id = %session_id, "No deposit for completed session");
            return Ok(Reconciliation::UnknownSession { session_id });
        };

        match self.store.mark_completed(&deposit.id).await {
            Ok(true) => {
                tracing::info!(
                    deposit_id = %deposit.id,
                    session_id = %session_id,
                    amount = %deposit.amount,
                    "Deposit completed"
                );
                Ok(Reconciliation::Completed {
                    deposit_id: deposit.id,
                    session_id,
                })
            }
            Ok(false) => {
                tracing::debug!(
                    deposit_id = %deposit.id,
                    session_id = %session_id,
                    "Deposit already completed"
                );
                Ok(Reconciliation::AlreadyCompleted {
                    deposit_id: deposit.id,
                    session_id,
                })
            }
            // Removed between lookup and update.
            Err(StoreError::NotFound) => {
                tracing::warn!(session_id = %session_id, "Deposit disappeared during completion");
                Ok(Reconciliation::UnknownSession { session_id })
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    session_id = %session_id,
                    "Failed to complete deposit"
                );
                Err(e.into())
            }
        }
    }
}

fn unrecognized(reason: String) -> Reconciliation {
    tracing::warn!(reason = %reason, "Acknowledging unusable webhook payload");
    Reconciliation::Unrecognized { reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use deposit_core::{DepositStatus, NewDeposit};
    use deposit_store::MemoryStore;
    use serde_json::json;

    use crate::stripe::StripeSignatureVerifier;

    const SECRET: &str = "whsec_unit";

    fn signer() -> StripeSignatureVerifier {
        StripeSignatureVerifier::new(SECRET, Duration::from_secs(300))
    }

    fn setup() -> (WebhookReconciler, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let reconciler = WebhookReconciler::new(Arc::new(signer()), store.clone());
        (reconciler, store)
    }

    fn event(event_type: &str, session_id: &str) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "id": "evt_unit",
            "type": event_type,
            "data": { "object": { "id": session_id, "object": "checkout.session" } }
        }))
        .unwrap()
    }

    fn signed(payload: &[u8]) -> String {
        signer().sign(payload, chrono::Utc::now().timestamp())
    }

    #[tokio::test]
    async fn completes_pending_deposit_once() {
        let (reconciler, store) = setup();
        let id = store
            .create(NewDeposit::for_session("cs_1", 5000))
            .await
            .unwrap();

        let payload = event(CHECKOUT_SESSION_COMPLETED, "cs_1");
        let header = signed(&payload);

        let first = reconciler.handle_event(&payload, &header).await.unwrap();
        assert_eq!(
            first,
            Reconciliation::Completed {
                deposit_id: id,
                session_id: "cs_1".into()
            }
        );

        let completed_at = store.get(&id).await.unwrap().unwrap().completed_at;

        let second = reconciler.handle_event(&payload, &header).await.unwrap();
        assert!(matches!(second, Reconciliation::AlreadyCompleted { .. }));

        let deposit = store.get(&id).await.unwrap().unwrap();
        assert_eq!(deposit.status, DepositStatus::Completed);
        assert_eq!(deposit.completed_at, completed_at);
    }

    #[tokio::test]
    async fn bad_signature_mutates_nothing() {
        let (reconciler, store) = setup();
        let id = store
            .create(NewDeposit::for_session("cs_1", 5000))
            .await
            .unwrap();

        let payload = event(CHECKOUT_SESSION_COMPLETED, "cs_1");
        let forged = StripeSignatureVerifier::new("whsec_wrong", Duration::from_secs(300))
            .sign(&payload, chrono::Utc::now().timestamp());

        let err = reconciler.handle_event(&payload, &forged).await.unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::InvalidSignature(SignatureError::Mismatch)
        ));

        let err = reconciler.handle_event(&payload, "").await.unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::InvalidSignature(SignatureError::MissingHeader)
        ));

        let deposit = store.get(&id).await.unwrap().unwrap();
        assert_eq!(deposit.status, DepositStatus::Pending);
    }

    #[tokio::test]
    async fn signature_checked_before_parsing() {
        let (reconciler, _store) = setup();
        let err = reconciler
            .handle_event(b"not json", "t=1,v1=00")
            .await
            .unwrap_err();
        assert!(matches!(err, ReconcileError::InvalidSignature(_)));
    }

    #[tokio::test]
    async fn unknown_session_is_acknowledged() {
        let (reconciler, store) = setup();
        let payload = event(CHECKOUT_SESSION_COMPLETED, "cs_missing");

        let outcome = reconciler
            .handle_event(&payload, &signed(&payload))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Reconciliation::UnknownSession {
                session_id: "cs_missing".into()
            }
        );
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn other_event_types_are_ignored() {
        let (reconciler, store) = setup();
        let id = store
            .create(NewDeposit::for_session("cs_1", 5000))
            .await
            .unwrap();

        let payload = event("checkout.session.expired", "cs_1");
        let outcome = reconciler
            .handle_event(&payload, &signed(&payload))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Reconciliation::Ignored {
                event_type: "checkout.session.expired".into()
            }
        );

        let deposit = store.get(&id).await.unwrap().unwrap();
        assert_eq!(deposit.status, DepositStatus::Pending);
    }

    #[tokio::test]
    async fn other_event_shapes_are_acknowledged() {
        let (reconciler, _store) = setup();

        let payload = br#"{"type":"charge.refunded","data":{"object":{"id":"ch_1"}}}"#;
        let outcome = reconciler
            .handle_event(payload, &signed(payload))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Reconciliation::Ignored {
                event_type: "charge.refunded".into()
            }
        );
    }

    #[tokio::test]
    async fn unusable_payloads_are_acknowledged() {
        let (reconciler, store) = setup();
        let id = store
            .create(NewDeposit::for_session("cs_1", 5000))
            .await
            .unwrap();

        let no_session_id = serde_json::to_vec(&json!({
            "id": "evt_unit",
            "type": CHECKOUT_SESSION_COMPLETED,
            "data": { "object": { "object": "checkout.session" } }
        }))
        .unwrap();

        let payloads: [&[u8]; 4] = [
            b"not json",
            b"{\"not\":\"an event\"}",
            b"[1, 2, 3]",
            &no_session_id,
        ];

        for payload in payloads {
            let outcome = reconciler
                .handle_event(payload, &signed(payload))
                .await
                .unwrap();
            assert!(
                matches!(outcome, Reconciliation::Unrecognized { .. }),
                "unexpected outcome {outcome:?}"
            );
        }

        let deposit = store.get(&id).await.unwrap().unwrap();
        assert_eq!(deposit.status, DepositStatus::Pending);
    }
}
