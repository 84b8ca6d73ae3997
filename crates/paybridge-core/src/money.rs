//! Amount and currency value types.
//!
//! Amounts are integers in the currency's minor unit (cents for `usd`), the
//! same representation the processor uses on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PaymentError;

/// Currency used when a request does not name one.
pub const DEFAULT_CURRENCY: &str = "usd";

/// A strictly positive amount in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Amount(i64);

impl Amount {
    /// Create an amount, rejecting zero and negative values.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::InvalidAmount`] if `minor_units <= 0`.
    pub fn new(minor_units: i64) -> Result<Self, PaymentError> {
        if minor_units > 0 {
            Ok(Self(minor_units))
        } else {
            Err(PaymentError::InvalidAmount(minor_units))
        }
    }

    /// Create an amount in a const context.
    ///
    /// # Panics
    ///
    /// Panics if `minor_units <= 0`; in a `const` item this fails the build.
    #[must_use]
    pub const fn from_const(minor_units: i64) -> Self {
        assert!(minor_units > 0, "amount must be positive");
        Self(minor_units)
    }

    /// Return the amount in minor units.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Amount {
    type Error = PaymentError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for i64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A three-letter ISO currency code, stored lowercase as the processor expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Return the lowercase currency code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self(DEFAULT_CURRENCY.to_string())
    }
}

impl FromStr for Currency {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic()) {
            Ok(Self(code.to_ascii_lowercase()))
        } else {
            Err(PaymentError::InvalidCurrency(s.to_string()))
        }
    }
}

impl TryFrom<String> for Currency {
    type Error = PaymentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn const_amount_matches_checked_constructor() {
        const FEE: Amount = Amount::from_const(2000);
        assert_eq!(FEE, Amount::new(2000).unwrap());
    }

    #[test]
    fn positive_amount_is_accepted() {
        let amount = Amount::new(2000).unwrap();
        assert_eq!(amount.minor_units(), 2000);
    }

    #[test]
    fn zero_and_negative_amounts_are_rejected() {
        assert!(matches!(Amount::new(0), Err(PaymentError::InvalidAmount(0))));
        assert!(matches!(
            Amount::new(-5),
            Err(PaymentError::InvalidAmount(-5))
        ));
    }

    #[test]
    fn amount_deserializes_with_validation() {
        let amount: Amount = serde_json::from_str("1500").unwrap();
        assert_eq!(amount.minor_units(), 1500);
        assert!(serde_json::from_str::<Amount>("0").is_err());
    }

    #[test]
    fn currency_is_normalized_to_lowercase() {
        let currency: Currency = "USD".parse().unwrap();
        assert_eq!(currency.as_str(), "usd");
    }

    #[test]
    fn malformed_currency_is_rejected() {
        assert!("us".parse::<Currency>().is_err());
        assert!("usdd".parse::<Currency>().is_err());
        assert!("u5d".parse::<Currency>().is_err());
        assert!("".parse::<Currency>().is_err());
    }

    #[test]
    fn default_currency_is_usd() {
        assert_eq!(Currency::default().as_str(), DEFAULT_CURRENCY);
    }
}
