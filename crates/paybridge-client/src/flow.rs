//! Payment screen state machine.
//!
//! The flow asks the gateway for a payment intent as soon as an authenticated
//! user is known, then hands the intent's client secret to the processor's
//! client-side SDK when the customer submits their payment details:
//!
//! ```text
//! Loading ──start──▶ Ready ──submit──▶ Submitting ──▶ Succeeded
//!    │                 ▲                   │
//!    ▼                 │                   ▼
//!  Error(Reload)       └──── submit ─── Error(Resubmit)
//! ```
//!
//! `Succeeded` only reflects the confirmation call returning without an
//! immediate error. The gateway's webhook is the authoritative success signal.

use async_trait::async_trait;

use paybridge_core::{Amount, CreatePaymentIntentRequest, Currency, PaymentIntentId};

use crate::client::GatewayClient;
use crate::config::ClientConfig;
use crate::error::ClientError;

/// Fallback message when the processor rejects a confirmation without one.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// User handed over by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Username, sent as the intent's `userId`.
    pub username: String,
    /// Email attribute, used by the gateway for customer dedup.
    pub email: Option<String>,
}

/// What the payment screen charges for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOrder {
    /// Amount in minor currency units.
    pub amount: Amount,
    /// ISO currency code.
    pub currency: Currency,
}

impl PaymentOrder {
    /// $20.00 access fee charged by the payment screen.
    pub const ACCESS_FEE: Amount = Amount::from_const(2000);
}

impl Default for PaymentOrder {
    fn default() -> Self {
        Self {
            amount: Self::ACCESS_FEE,
            currency: Currency::default(),
        }
    }
}

/// Payment intent the screen is currently working with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentSession {
    /// Secret handed to the processor's client-side SDK.
    pub client_secret: String,
    /// The intent's processor ID.
    pub payment_intent_id: PaymentIntentId,
}

/// How the customer can get out of an error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retry {
    /// Reload the screen and request a fresh intent.
    Reload,
    /// Resubmit payment details against the same intent.
    Resubmit,
}

/// Payment screen state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentState {
    /// Waiting for a user or for the gateway to return an intent.
    Loading,
    /// Intent created; the payment form can be shown.
    Ready(IntentSession),
    /// Confirmation in flight.
    Submitting(IntentSession),
    /// Confirmation returned without an immediate error.
    Succeeded(IntentSession),
    /// Something failed; `message` is shown inline.
    Error {
        /// Human-readable error.
        message: String,
        /// Available retry affordance.
        retry: Retry,
    },
}

impl PaymentState {
    /// Short state name for logs and errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready(_) => "ready",
            Self::Submitting(_) => "submitting",
            Self::Succeeded(_) => "succeeded",
            Self::Error { .. } => "error",
        }
    }
}

/// Error returned by the processor's client-side confirmation call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ConfirmError {
    /// Message to show the customer.
    pub message: String,
}

impl ConfirmError {
    /// Create a confirmation error, falling back to a generic message.
    #[must_use]
    pub fn new(message: Option<String>) -> Self {
        Self {
            message: message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| UNEXPECTED_ERROR_MESSAGE.to_string()),
        }
    }
}

/// The processor's client-side SDK: collects card details and confirms the
/// intent identified by a client secret.
#[async_trait]
pub trait PaymentConfirmer: Send + Sync {
    /// Payment details collected by the processor's form.
    type Details: Sync;

    /// Confirm the payment. On success the processor redirects the customer
    /// to `return_url`.
    async fn confirm_payment(
        &self,
        client_secret: &str,
        details: &Self::Details,
        return_url: &str,
    ) -> Result<(), ConfirmError>;
}

type Observer = Box<dyn Fn(&PaymentState) + Send + Sync>;

/// Drives the payment screen from intent creation to confirmation.
pub struct PaymentFlow<C> {
    gateway: GatewayClient,
    confirmer: C,
    order: PaymentOrder,
    return_url: String,
    state: PaymentState,
    session: Option<IntentSession>,
    observer: Option<Observer>,
}

impl<C: PaymentConfirmer> PaymentFlow<C> {
    /// Create a flow in the `Loading` state.
    pub fn new(
        gateway: GatewayClient,
        confirmer: C,
        order: PaymentOrder,
        return_url: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            confirmer,
            order,
            return_url: return_url.into(),
            state: PaymentState::Loading,
            session: None,
            observer: None,
        }
    }

    /// Create a flow from client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway client cannot be built.
    pub fn from_config(
        config: &ClientConfig,
        confirmer: C,
        order: PaymentOrder,
    ) -> Result<Self, ClientError> {
        let gateway = GatewayClient::new(config.api_url.clone())?;
        Ok(Self::new(gateway, confirmer, order, config.redirect_url.clone()))
    }

    /// Register a callback invoked on every state change.
    #[must_use]
    pub fn with_observer(mut self, observer: impl Fn(&PaymentState) + Send + Sync + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &PaymentState {
        &self.state
    }

    /// Request a payment intent for `user`.
    ///
    /// Without a user the flow stays in `Loading` and makes no request.
    /// Calling this outside `Loading` does nothing.
    pub async fn start(&mut self, user: Option<&AuthenticatedUser>) -> &PaymentState {
        if !matches!(self.state, PaymentState::Loading) {
            tracing::debug!(state = self.state.name(), "Payment flow already started");
            return &self.state;
        }

        let Some(user) = user else {
            tracing::debug!("Waiting for an authenticated user");
            return &self.state;
        };

        let request = CreatePaymentIntentRequest {
            amount: self.order.amount.minor_units(),
            currency: Some(self.order.currency.to_string()),
            user_id: Some(user.username.clone()),
            email: user.email.clone(),
        };

        match self.gateway.create_payment_intent(&request).await {
            Ok(response) => {
                let session = IntentSession {
                    client_secret: response.client_secret,
                    payment_intent_id: response.payment_intent_id,
                };
                tracing::info!(
                    payment_intent_id = %session.payment_intent_id,
                    "Payment intent ready"
                );
                self.session = Some(session.clone());
                self.transition(PaymentState::Ready(session));
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create payment intent");
                self.transition(PaymentState::Error {
                    message: format!("Failed to create payment intent: {e}"),
                    retry: Retry::Reload,
                });
            }
        }

        &self.state
    }

    /// Confirm the current intent with the collected payment details.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidTransition` unless the flow is `Ready` or
    /// in a resubmittable `Error`. Confirmation failures are not errors here:
    /// they move the flow to `Error` with the processor's message.
    pub async fn submit(&mut self, details: &C::Details) -> Result<&PaymentState, ClientError> {
        let resubmittable = matches!(
            self.state,
            PaymentState::Ready(_) | PaymentState::Error { retry: Retry::Resubmit, .. }
        );
        let session = match (&self.session, resubmittable) {
            (Some(session), true) => session.clone(),
            _ => {
                return Err(ClientError::InvalidTransition {
                    action: "submit payment",
                    state: self.state.name(),
                })
            }
        };

        self.transition(PaymentState::Submitting(session.clone()));

        let result = self
            .confirmer
            .confirm_payment(&session.client_secret, details, &self.return_url)
            .await;

        match result {
            Ok(()) => {
                tracing::info!(
                    payment_intent_id = %session.payment_intent_id,
                    "Payment confirmation submitted"
                );
                self.transition(PaymentState::Succeeded(session));
            }
            Err(e) => {
                tracing::warn!(
                    payment_intent_id = %session.payment_intent_id,
                    error = %e,
                    "Payment confirmation failed"
                );
                self.transition(PaymentState::Error {
                    message: e.message,
                    retry: Retry::Resubmit,
                });
            }
        }

        Ok(&self.state)
    }

    /// Drop the current intent and return to `Loading`, like a page reload.
    pub fn reload(&mut self) {
        self.session = None;
        self.transition(PaymentState::Loading);
    }

    fn transition(&mut self, next: PaymentState) {
        tracing::debug!(from = self.state.name(), to = next.name(), "Payment flow transition");
        self.state = next;
        if let Some(observer) = &self.observer {
            observer(&self.state);
        }
    }
}

impl<C> std::fmt::Debug for PaymentFlow<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentFlow")
            .field("order", &self.order)
            .field("return_url", &self.return_url)
            .field("state", &self.state.name())
            .finish_non_exhaustive()
    }
}
