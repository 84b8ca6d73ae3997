//! Core types for paybridge.
//!
//! This crate provides the types shared by the gateway service and its client:
//!
//! - **Identifiers**: `CustomerId`, `PaymentIntentId`
//! - **Money**: `Amount`, `Currency`
//! - **Wire types**: `CreatePaymentIntentRequest`, `CreatePaymentIntentResponse`, `ErrorResponse`
//!
//! # Amounts
//!
//! Amounts are `i64` minor currency units (cents for `usd`), exactly as the
//! payment processor represents them. `2000` with currency `usd` is $20.00.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod ids;
pub mod money;
pub mod payment;

pub use error::PaymentError;
pub use ids::{CustomerId, IdError, PaymentIntentId};
pub use money::{Amount, Currency, DEFAULT_CURRENCY};
pub use payment::{
    CreatePaymentIntentRequest, CreatePaymentIntentResponse, ErrorResponse, PaymentIntentOrder,
    DEFAULT_INTEGRATION_TYPE, INTEGRATION_TYPE_METADATA_KEY, USER_ID_METADATA_KEY,
};
