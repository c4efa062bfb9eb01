//! Deposit service HTTP client implementation.

use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::error::ClientError;
use crate::types::{
    ApiErrorResponse, CheckoutSessionResponse, CreateCheckoutSessionRequest, DepositResponse,
};

/// Deposit service API client.
///
/// Starts hosted checkouts and looks up deposits by session.
#[derive(Debug, Clone)]
pub struct DepositClient {
    client: Client,
    base_url: String,
}

impl DepositClient {
    /// Create a new deposit client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the deposit service (e.g., `"http://deposits:8000"`)
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot be
    /// built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new deposit client with custom options.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot be
    /// built.
    pub fn with_options(
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Configuration("base URL is empty".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Open a hosted checkout session for `amount` minor units.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 400 for invalid input and 500 if
    /// the payment gateway failed, or a transport error.
    pub async fn create_checkout_session(
        &self,
        product_name: impl Into<String>,
        amount: i64,
    ) -> Result<CheckoutSessionResponse, ClientError> {
        let url = format!("{}/api/create-checkout-session", self.base_url);
        let request = CreateCheckoutSessionRequest {
            product_name: product_name.into(),
            amount,
        };

        let response = self.client.post(&url).json(&request).send().await?;

        self.handle_response(response).await
    }

    /// Look up the deposit for a gateway session.
    ///
    /// Returns `None` if the service has no deposit for the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error
    /// other than 404.
    pub async fn get_deposit(
        &self,
        session_id: &str,
    ) -> Result<Option<DepositResponse>, ClientError> {
        let url = format!("{}/api/deposits/{}", self.base_url, session_id);

        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(session_id = %session_id, "Deposit not found");
            return Ok(None);
        }

        self.handle_response(response).await.map(Some)
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&body)?);
        }

        let message = match serde_json::from_slice::<ApiErrorResponse>(&body) {
            Ok(api_error) => api_error.error,
            Err(_) => format!("HTTP {status}"),
        };

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}
