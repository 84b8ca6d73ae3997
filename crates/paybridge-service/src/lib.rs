//! Paybridge HTTP payment gateway.
//!
//! This crate brokers payment sessions between a browser client and Stripe:
//!
//! - `POST /api/create-payment-intent` finds or creates a Stripe customer by
//!   email, creates a payment intent and returns its client secret
//! - `POST /api/webhook` verifies Stripe's signature over the raw body and
//!   logs payment outcomes
//! - In production mode, the prebuilt frontend bundle is served with a
//!   single-page-application fallback
//!
//! The service stores nothing. Customers and payment intents live in Stripe,
//! and webhook events are logged and acknowledged, never persisted.
//!
//! # Authentication
//!
//! Users sign in with an external identity provider in the browser. The
//! gateway trusts the `userId` and `email` it is sent and only records them as
//! Stripe metadata.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers are async for the router

pub mod config;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod stripe;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
pub use stripe::{StripeClient, StripeError, WebhookError, WebhookVerifier};
