//! Deposit Service - HTTP API for hosted-checkout deposits
//!
//! This is the main entry point for the deposit service.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deposit_service::{create_router, open_store, AppState, ServiceConfig, StripeClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,deposit_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Deposit Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env()?;

    tracing::info!(
        listen_addr = %config.listen_addr,
        data_dir = %config.data_dir,
        postgres = %config.database_url.is_some(),
        stripe_api_base = %config.stripe_api_base,
        currency = %config.currency,
        "Service configuration loaded"
    );

    let store = open_store(&config).await?;

    let stripe = StripeClient::new(config.stripe_api_key.clone(), config.gateway_timeout())?
        .with_base_url(config.stripe_api_base.clone());

    let state = AppState::new(store, Arc::new(stripe), config.clone());

    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
