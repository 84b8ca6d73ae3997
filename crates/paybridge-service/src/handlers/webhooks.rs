//! Stripe webhook handler.
//!
//! Deliveries are verified against the raw body before anything else happens.
//! Once verified, every event is acknowledged with `200`, whether or not its
//! type is recognized, so Stripe does not keep redelivering it. Stripe
//! delivers at least once and this service keeps no record of event IDs, so
//! the same event may be handled more than once.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};

use crate::error::ApiError;
use crate::state::AppState;
use crate::stripe::webhook::SIGNATURE_HEADER;
use crate::stripe::{PaymentIntent, WebhookError, WebhookEvent};

/// Event type sent when a payment intent completes successfully.
pub const PAYMENT_INTENT_SUCCEEDED: &str = "payment_intent.succeeded";

/// Event type sent when a payment attempt on an intent fails.
pub const PAYMENT_INTENT_FAILED: &str = "payment_intent.payment_failed";

/// A verified event, classified by what this service does with it.
#[derive(Debug)]
pub enum PaymentEvent {
    /// `payment_intent.succeeded`.
    Succeeded(PaymentIntent),
    /// `payment_intent.payment_failed`.
    Failed(PaymentIntent),
    /// Any other event type, or a payment event whose object did not parse.
    Unhandled {
        /// The event type as sent by Stripe.
        event_type: String,
    },
}

impl PaymentEvent {
    /// Classify a verified event.
    #[must_use]
    pub fn classify(event: &WebhookEvent) -> Self {
        let wrap: fn(PaymentIntent) -> Self = match event.event_type.as_str() {
            PAYMENT_INTENT_SUCCEEDED => Self::Succeeded,
            PAYMENT_INTENT_FAILED => Self::Failed,
            _ => {
                return Self::Unhandled {
                    event_type: event.event_type.clone(),
                }
            }
        };

        match serde_json::from_value::<PaymentIntent>(event.data.object.clone()) {
            Ok(intent) => wrap(intent),
            Err(e) => {
                tracing::warn!(
                    event_id = %event.id,
                    event_type = %event.event_type,
                    error = %e,
                    "Payment event object is not a payment intent"
                );
                Self::Unhandled {
                    event_type: event.event_type.clone(),
                }
            }
        }
    }
}

/// Handle Stripe webhooks.
///
/// Takes the body as raw bytes: the signature covers the exact bytes Stripe
/// sent, so the body must not pass through a JSON extractor first.
pub async fn stripe_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let verified = match state.webhooks.as_ref() {
        Some(verifier) => verifier.construct_event(&body, signature),
        None => Err(WebhookError::SecretNotConfigured),
    };

    let event = verified.map_err(|e| {
        if matches!(e, WebhookError::SecretNotConfigured) {
            tracing::error!("Rejecting Stripe webhook: signing secret not configured");
        } else {
            tracing::warn!(error = %e, "Webhook signature verification failed");
        }
        ApiError::from(e)
    })?;

    tracing::info!(
        event_type = %event.event_type,
        event_id = %event.id,
        livemode = event.livemode,
        "Received Stripe webhook"
    );

    handle_event(&event);

    Ok(StatusCode::OK)
}

/// Log the outcome carried by a verified event. Nothing is persisted.
pub fn handle_event(event: &WebhookEvent) -> PaymentEvent {
    let classified = PaymentEvent::classify(event);

    match &classified {
        PaymentEvent::Succeeded(intent) => {
            tracing::info!(
                payment_intent_id = %intent.id,
                amount = intent.amount,
                currency = %intent.currency,
                customer = ?intent.customer,
                "PaymentIntent for {} was successful",
                intent.amount
            );
        }
        PaymentEvent::Failed(intent) => {
            let reason = intent
                .last_payment_error
                .as_ref()
                .and_then(|e| e.message.as_deref());
            tracing::warn!(
                payment_intent_id = %intent.id,
                reason = ?reason,
                "Payment failed"
            );
        }
        PaymentEvent::Unhandled { event_type } => {
            tracing::info!(event_type = %event_type, "Unhandled event type");
        }
    }

    classified
}
