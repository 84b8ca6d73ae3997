//! Stripe integration.
//!
//! Stripe handles:
//! - Customer lookup and registration
//! - Payment intent creation
//! - Signed webhook delivery of payment outcomes

pub mod client;
pub mod types;
pub mod webhook;

pub use client::{StripeClient, StripeError};
pub use types::*;
pub use webhook::{WebhookError, WebhookVerifier};
