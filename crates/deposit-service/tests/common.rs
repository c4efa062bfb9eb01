//! Common test utilities for deposit-service integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use axum_test::TestServer;
use serde_json::json;

use deposit_service::{
    create_router, AppState, CheckoutSessionRequest, GatewayError, GatewaySession,
    PaymentGateway, ServiceConfig, StripeSignatureVerifier,
};
use deposit_store::{DepositStore, MemoryStore};

/// Webhook signing secret shared by the harness and the service.
pub const WEBHOOK_SECRET: &str = "whsec_test_harness";

/// Gateway double that hands out sequential session ids.
#[derive(Default)]
pub struct FakeGateway {
    calls: AtomicUsize,
    failure: Option<String>,
    last_request: std::sync::Mutex<Option<CheckoutSessionRequest>>,
}

impl FakeGateway {
    /// A gateway that rejects every request with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Number of session creations attempted.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<CheckoutSessionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<GatewaySession, GatewayError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_request.lock().unwrap() = Some(request.clone());

        if let Some(message) = &self.failure {
            return Err(GatewayError::Rejected {
                message: message.clone(),
                code: None,
            });
        }

        let id = format!("cs_test_{n:04}");
        Ok(GatewaySession {
            url: format!("https://checkout.stripe.com/c/pay/{id}"),
            id,
        })
    }
}

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The store behind the server, for direct assertions.
    pub store: Arc<MemoryStore>,
    /// The gateway double behind the server.
    pub gateway: Arc<FakeGateway>,
    signer: StripeSignatureVerifier,
}

impl TestHarness {
    /// Create a new test harness with an empty store and a working gateway.
    pub fn new() -> Self {
        Self::with_gateway(FakeGateway::default())
    }

    /// Create a test harness around a specific gateway double.
    pub fn with_gateway(gateway: FakeGateway) -> Self {
        let store = Arc::new(MemoryStore::new());
        let gateway = Arc::new(gateway);

        let state = AppState::new(store.clone(), gateway.clone(), test_config());
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            gateway,
            signer: StripeSignatureVerifier::new(WEBHOOK_SECRET, Duration::from_secs(300)),
        }
    }

    /// Signature header name.
    pub fn signature_header() -> HeaderName {
        HeaderName::from_static("stripe-signature")
    }

    /// A valid signature header value for `payload`, signed now.
    pub fn sign(&self, payload: &[u8]) -> HeaderValue {
        let header = self.signer.sign(payload, chrono::Utc::now().timestamp());
        HeaderValue::from_str(&header).expect("signature header is ASCII")
    }

    /// Number of deposits in the store.
    pub async fn deposit_count(&self) -> usize {
        self.store.count().await.expect("count deposits")
    }

    /// POST a signed webhook body to `path`.
    pub async fn deliver(&self, path: &str, payload: &[u8]) -> axum_test::TestResponse {
        self.server
            .post(path)
            .add_header(Self::signature_header(), self.sign(payload))
            .content_type("application/json")
            .bytes(payload.to_vec().into())
            .await
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Service configuration for tests.
pub fn test_config() -> ServiceConfig {
    ServiceConfig {
        listen_addr: "127.0.0.1:0".into(),
        stripe_api_key: "sk_test_harness".into(),
        stripe_webhook_secret: WEBHOOK_SECRET.into(),
        success_url: "http://localhost:3000/success".into(),
        cancel_url: "http://localhost:3000/cancel".into(),
        ..ServiceConfig::default()
    }
}

/// A gateway event body of the given type for `session_id`.
pub fn event_payload(event_type: &str, session_id: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "id": "evt_test_harness",
        "object": "event",
        "type": event_type,
        "created": 1_700_000_000,
        "data": {
            "object": {
                "id": session_id,
                "object": "checkout.session",
                "payment_status": "paid",
                "status": "complete",
                "amount_total": 5000,
                "currency": "gbp"
            }
        }
    }))
    .expect("serialize event")
}

/// A `checkout.session.completed` body for `session_id`.
pub fn completed_event(session_id: &str) -> Vec<u8> {
    event_payload("checkout.session.completed", session_id)
}
