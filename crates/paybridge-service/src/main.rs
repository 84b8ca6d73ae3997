//! Paybridge Service - HTTP gateway for Stripe payment intents and webhooks
//!
//! This is the main entry point for the paybridge service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paybridge_service::config::load_dotenv;
use paybridge_service::{create_router, AppState, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,paybridge=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Paybridge Service");

    // Load .env, then configuration from environment
    load_dotenv(None);
    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        stripe_configured = %config.stripe_secret_key.is_some(),
        webhooks_configured = %config.stripe_webhook_secret.is_some(),
        production = %config.production,
        default_currency = %config.default_currency,
        "Service configuration loaded"
    );

    let listen_addr = config.listen_addr.clone();
    let state = AppState::new(config);
    let app = create_router(state);

    tracing::info!(listen_addr = %listen_addr, "Server running");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
