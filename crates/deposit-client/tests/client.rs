//! Client SDK tests against a mock deposit service.

use deposit_client::{ClientError, ClientOptions, DepositClient};
use deposit_core::{Decimal, DepositStatus};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn create_checkout_session_posts_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/create-checkout-session"))
        .and(body_json(json!({ "product_name": "Top-up", "amount": 5000 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://checkout.stripe.com/c/pay/cs_test_1",
            "session_id": "cs_test_1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = DepositClient::new(server.uri()).unwrap();
    let session = client.create_checkout_session("Top-up", 5000).await.unwrap();

    assert_eq!(session.session_id, "cs_test_1");
    assert_eq!(session.url, "https://checkout.stripe.com/c/pay/cs_test_1");
}

#[tokio::test]
async fn gateway_failure_surfaces_as_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/create-checkout-session"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "error": "Invalid API Key provided" })),
        )
        .mount(&server)
        .await;

    let client = DepositClient::new(server.uri()).unwrap();
    let err = client
        .create_checkout_session("Top-up", 5000)
        .await
        .unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Invalid API Key provided");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn validation_error_keeps_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/create-checkout-session"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error": "product_name must not be empty" })),
        )
        .mount(&server)
        .await;

    let client = DepositClient::new(server.uri()).unwrap();
    let err = client.create_checkout_session("", 5000).await.unwrap_err();

    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn get_deposit_parses_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/deposits/cs_test_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "01HZX4Q8M8N6W2V3J9K7T5R1PA",
            "amount": "50.00",
            "session_id": "cs_test_1",
            "status": "completed",
            "created_at": "2025-01-01T12:00:00+00:00",
            "updated_at": "2025-01-01T12:05:00+00:00",
            "completed_at": "2025-01-01T12:05:00+00:00"
        })))
        .mount(&server)
        .await;

    let client = DepositClient::new(server.uri()).unwrap();
    let deposit = client.get_deposit("cs_test_1").await.unwrap().unwrap();

    assert_eq!(deposit.amount, Decimal::new(5000, 2));
    assert_eq!(deposit.status, DepositStatus::Completed);
    assert!(deposit.is_completed());
    assert!(deposit.completed_at.is_some());
}

#[tokio::test]
async fn get_deposit_not_found_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/deposits/cs_missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "error": "No deposit for session cs_missing" })),
        )
        .mount(&server)
        .await;

    let client = DepositClient::with_options(
        server.uri(),
        ClientOptions {
            timeout_seconds: 5,
        },
    )
    .unwrap();

    assert!(client.get_deposit("cs_missing").await.unwrap().is_none());
}

#[tokio::test]
async fn non_json_error_reports_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/deposits/cs_test_1"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let client = DepositClient::new(server.uri()).unwrap();
    let err = client.get_deposit("cs_test_1").await.unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 502, ref message } if message.contains("502")));
}
