//! Health check handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
    /// Whether payment intents can be created.
    pub stripe_configured: bool,
    /// Whether webhooks can be verified.
    pub webhooks_configured: bool,
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "paybridge".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        stripe_configured: state.has_stripe(),
        webhooks_configured: state.has_webhooks(),
    })
}
