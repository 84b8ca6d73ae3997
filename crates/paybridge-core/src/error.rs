//! Error types for paybridge.

/// Errors raised while validating payment input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    /// Amount was zero or negative.
    #[error("invalid amount: {0} (must be a positive integer in minor currency units)")]
    InvalidAmount(i64),

    /// Currency was not a three-letter code.
    #[error("invalid currency: {0:?} (expected a three-letter code)")]
    InvalidCurrency(String),
}
