//! Payment intent handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use paybridge_core::{
    CreatePaymentIntentRequest, CreatePaymentIntentResponse, CustomerId, PaymentIntentOrder,
};

use crate::error::ApiError;
use crate::state::AppState;
use crate::stripe::{PaymentIntentParams, StripeClient, StripeError};

/// Create a payment intent and return its client secret.
///
/// When the request carries an email, the first Stripe customer with that
/// email is reused, or a new one is created. The lookup and the create are two
/// separate calls, so concurrent first-time requests for the same email can
/// both create a customer.
///
/// Every call creates a new intent; there is no idempotency key.
pub async fn create_payment_intent(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreatePaymentIntentRequest>, JsonRejection>,
) -> Result<Json<CreatePaymentIntentResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let order = request.into_order(&state.config.default_currency)?;

    let stripe = state
        .stripe
        .as_ref()
        .ok_or(ApiError::NotConfigured("payment processor"))?;

    let response = create_intent_for_order(stripe, &order, &state.config.integration_type)
        .await
        .map_err(|e| {
            tracing::error!(
                error = %e,
                amount = %order.amount,
                currency = %order.currency,
                "Error creating payment intent"
            );
            ApiError::from(e)
        })?;

    Ok(Json(response))
}

async fn create_intent_for_order(
    stripe: &StripeClient,
    order: &PaymentIntentOrder,
    integration_type: &str,
) -> Result<CreatePaymentIntentResponse, StripeError> {
    let customer = match order.email.as_deref() {
        Some(email) => Some(resolve_customer(stripe, email, order.user_id.as_deref()).await?),
        None => None,
    };

    let intent = stripe
        .create_payment_intent(&PaymentIntentParams {
            amount: order.amount,
            currency: &order.currency,
            customer: customer.as_ref(),
            user_id: order.user_id.as_deref(),
            integration_type,
        })
        .await?;

    let client_secret = intent
        .client_secret
        .ok_or(StripeError::MissingField("client_secret"))?;

    tracing::info!(
        payment_intent_id = %intent.id,
        customer = ?customer,
        amount = %order.amount,
        currency = %order.currency,
        "Payment intent created"
    );

    Ok(CreatePaymentIntentResponse {
        client_secret,
        payment_intent_id: intent.id,
    })
}

/// Find the first customer with `email`, creating one when none exists.
async fn resolve_customer(
    stripe: &StripeClient,
    email: &str,
    user_id: Option<&str>,
) -> Result<CustomerId, StripeError> {
    let existing = stripe.list_customers_by_email(email).await?;

    if let Some(customer) = existing.data.into_iter().next() {
        tracing::debug!(customer = %customer.id, "Reusing existing Stripe customer");
        return Ok(customer.id);
    }

    let customer = stripe.create_customer(email, user_id).await?;
    tracing::info!(customer = %customer.id, user_id = ?user_id, "Created Stripe customer");

    Ok(customer.id)
}
