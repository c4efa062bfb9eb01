//! Service configuration.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Configuration errors raised at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required setting is absent or empty.
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    /// No `DATABASE_URL` and the binary was built without `rocksdb-backend`.
    #[error("no durable deposit store: set DATABASE_URL or build with the rocksdb-backend feature")]
    NoDurableStore,
}

/// Service configuration loaded from environment variables.
///
/// Built once at startup and handed to the components that need it; nothing
/// reads the environment after that.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8000").
    pub listen_addr: String,

    /// Path to `RocksDB` data directory (default: "./data/deposits").
    pub data_dir: String,

    /// PostgreSQL connection string. Takes precedence over `data_dir`.
    pub database_url: Option<String>,

    /// Stripe secret API key.
    pub stripe_api_key: String,

    /// Stripe webhook signing secret.
    pub stripe_webhook_secret: String,

    /// Stripe API base URL (default: `https://api.stripe.com/v1`).
    pub stripe_api_base: String,

    /// Where Stripe sends the customer after paying.
    pub success_url: String,

    /// Where Stripe sends the customer after cancelling.
    pub cancel_url: String,

    /// Currency for checkout line items (default: "gbp").
    pub currency: String,

    /// Upper bound for a session-creation round-trip, in seconds.
    pub gateway_timeout_seconds: u64,

    /// Accepted skew between a webhook's signed timestamp and now, in seconds.
    /// Zero disables the check.
    pub webhook_tolerance_seconds: u64,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

/// Stripe secrets file structure.
#[derive(Debug, Deserialize)]
struct StripeSecrets {
    api_key: String,
    #[serde(default)]
    webhook_secret: Option<String>,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the Stripe API key or webhook secret
    /// is not configured.
    pub fn from_env() -> Result<Self, ConfigError> {
        let (stripe_api_key, stripe_webhook_secret) = load_stripe_secrets();
        let defaults = Self::default();

        let config = Self {
            listen_addr: env_or("LISTEN_ADDR", defaults.listen_addr),
            data_dir: env_or("DATA_DIR", defaults.data_dir),
            database_url: std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            stripe_api_key: stripe_api_key.unwrap_or_default(),
            stripe_webhook_secret: stripe_webhook_secret.unwrap_or_default(),
            stripe_api_base: env_or("STRIPE_API_BASE", defaults.stripe_api_base),
            success_url: env_or("STRIPE_SUCCESS_URL", defaults.success_url),
            cancel_url: env_or("STRIPE_CANCEL_URL", defaults.cancel_url),
            currency: env_or("CHECKOUT_CURRENCY", defaults.currency).to_lowercase(),
            gateway_timeout_seconds: env_parse_or(
                "GATEWAY_TIMEOUT_SECONDS",
                defaults.gateway_timeout_seconds,
            ),
            webhook_tolerance_seconds: env_parse_or(
                "WEBHOOK_TOLERANCE_SECONDS",
                defaults.webhook_tolerance_seconds,
            ),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: env_parse_or("MAX_BODY_BYTES", defaults.max_body_bytes),
            request_timeout_seconds: env_parse_or(
                "REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout_seconds,
            ),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that the settings without defaults are present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` naming the first absent setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stripe_api_key.is_empty() {
            return Err(ConfigError::Missing("STRIPE_SECRET"));
        }
        if self.stripe_webhook_secret.is_empty() {
            return Err(ConfigError::Missing("STRIPE_WEBHOOK_SECRET"));
        }
        Ok(())
    }

    /// Gateway round-trip timeout.
    #[must_use]
    pub const fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout_seconds)
    }

    /// Webhook timestamp tolerance.
    #[must_use]
    pub const fn webhook_tolerance(&self) -> Duration {
        Duration::from_secs(self.webhook_tolerance_seconds)
    }
}

fn env_or(name: &str, default: String) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
}

fn env_parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Load Stripe secrets from file or environment.
fn load_stripe_secrets() -> (Option<String>, Option<String>) {
    let secret_paths = [".secrets/stripe.json", "../.secrets/stripe.json"];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<StripeSecrets>(path) {
            tracing::info!(path = %path, "Loaded Stripe secrets from file");
            let webhook_secret = secrets
                .webhook_secret
                .or_else(|| std::env::var("STRIPE_WEBHOOK_SECRET").ok());
            return (Some(secrets.api_key), webhook_secret);
        }
    }

    // Fall back to environment variables
    tracing::debug!("Stripe secrets file not found, using environment variables");
    (
        std::env::var("STRIPE_SECRET")
            .or_else(|_| std::env::var("STRIPE_API_KEY"))
            .ok(),
        std::env::var("STRIPE_WEBHOOK_SECRET").ok(),
    )
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".into(),
            data_dir: "./data/deposits".into(),
            database_url: None,
            stripe_api_key: String::new(),
            stripe_webhook_secret: String::new(),
            stripe_api_base: "https://api.stripe.com/v1".into(),
            success_url: "http://localhost:3000/success".into(),
            cancel_url: "http://localhost:3000/cancel".into(),
            currency: "gbp".into(),
            gateway_timeout_seconds: 10,
            webhook_tolerance_seconds: 300,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_requires_secrets() {
        let config = ServiceConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("STRIPE_SECRET"))
        ));

        let config = ServiceConfig {
            stripe_api_key: "sk_test_x".into(),
            ..ServiceConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("STRIPE_WEBHOOK_SECRET"))
        ));
    }

    #[test]
    fn complete_config_validates() {
        let config = ServiceConfig {
            stripe_api_key: "sk_test_x".into(),
            stripe_webhook_secret: "whsec_x".into(),
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.gateway_timeout(), Duration::from_secs(10));
        assert_eq!(config.webhook_tolerance(), Duration::from_secs(300));
    }
}
