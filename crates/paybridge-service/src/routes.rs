//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{health, payments, webhooks};
use crate::state::AppState;

/// Maximum concurrent requests for the payment intent endpoint.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// - `GET /health` - Health check
/// - `POST /api/create-payment-intent` - Create a payment intent (rate limited)
/// - `POST /api/webhook` - Stripe webhooks (signature verification)
///
/// In production mode every other `GET` is served from the frontend bundle,
/// falling back to its `index.html` so client-side routes resolve.
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;
    let frontend_dir = state
        .config
        .production
        .then(|| state.config.frontend_dir.clone());

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    let api_routes = Router::new()
        .route("/create-payment-intent", post(payments::create_payment_intent))
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS))
        // Webhooks (no rate limit - delivery is paced by Stripe)
        .route("/webhook", post(webhooks::stripe_webhook));

    let mut router = Router::new()
        .route("/health", get(health::health))
        .nest("/api", api_routes);

    if let Some(dir) = frontend_dir {
        tracing::info!(dir = %dir.display(), "Serving frontend bundle");
        router = router.fallback_service(spa_service(&dir));
    }

    router
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Static files from `dir`, with `index.html` answering any path that has no file.
fn spa_service(dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")))
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
