//! Paybridge Client SDK.
//!
//! This crate provides the gateway API client and the payment-screen flow
//! that drives it.
//!
//! # Example
//!
//! ```no_run
//! use paybridge_client::{
//!     AuthenticatedUser, ClientConfig, ConfirmError, PaymentConfirmer, PaymentFlow, PaymentOrder,
//! };
//!
//! struct Card;
//!
//! #[async_trait::async_trait]
//! impl PaymentConfirmer for Card {
//!     type Details = ();
//!
//!     async fn confirm_payment(
//!         &self,
//!         _client_secret: &str,
//!         _details: &(),
//!         _return_url: &str,
//!     ) -> Result<(), ConfirmError> {
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() -> Result<(), paybridge_client::ClientError> {
//! let config = ClientConfig::from_env();
//! let mut flow = PaymentFlow::from_config(&config, Card, PaymentOrder::default())?;
//!
//! let user = AuthenticatedUser {
//!     username: "alice".to_string(),
//!     email: Some("alice@example.com".to_string()),
//! };
//! flow.start(Some(&user)).await;
//! flow.submit(&()).await?;
//!
//! println!("Payment screen is {}", flow.state().name());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod config;
mod error;
mod flow;

pub use client::{ClientOptions, GatewayClient};
pub use config::{ClientConfig, DEFAULT_API_URL, DEFAULT_REDIRECT_URL};
pub use error::ClientError;
pub use flow::{
    AuthenticatedUser, ConfirmError, IntentSession, PaymentConfirmer, PaymentFlow, PaymentOrder,
    PaymentState, Retry, UNEXPECTED_ERROR_MESSAGE,
};
