//! Application state.

use std::sync::Arc;
use std::time::Duration;

use crate::config::ServiceConfig;
use crate::stripe::{StripeClient, WebhookVerifier};

/// Application state shared across handlers.
///
/// Built once at startup from [`ServiceConfig`] and handed to the router; it
/// is read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: ServiceConfig,

    /// Stripe client for customers and payment intents (optional).
    pub stripe: Option<Arc<StripeClient>>,

    /// Webhook signature verifier (optional).
    pub webhooks: Option<Arc<WebhookVerifier>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServiceConfig) -> Self {
        let stripe = config.stripe_secret_key.as_ref().and_then(|key| {
            match StripeClient::with_options(
                key,
                &config.stripe_api_base,
                Duration::from_secs(config.request_timeout_seconds),
            ) {
                Ok(client) => {
                    tracing::info!(api_base = %config.stripe_api_base, "Stripe integration enabled");
                    Some(Arc::new(client))
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create Stripe client");
                    None
                }
            }
        });

        if stripe.is_none() {
            tracing::warn!("Stripe not configured - payment intents will not be available");
        }

        let webhooks = config.stripe_webhook_secret.as_ref().map(|secret| {
            Arc::new(WebhookVerifier::new(
                secret.clone(),
                config.webhook_tolerance_seconds,
            ))
        });

        if webhooks.is_none() {
            tracing::warn!("Stripe webhook secret not configured - webhooks will be rejected");
        }

        Self {
            config,
            stripe,
            webhooks,
        }
    }

    /// Check if Stripe is configured.
    #[must_use]
    pub fn has_stripe(&self) -> bool {
        self.stripe.is_some()
    }

    /// Check if webhook verification is configured.
    #[must_use]
    pub fn has_webhooks(&self) -> bool {
        self.webhooks.is_some()
    }
}
