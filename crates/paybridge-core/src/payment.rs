//! Wire types for the gateway's payment-intent API.
//!
//! These are shared by the service (which serves them) and the client crate
//! (which sends and receives them). Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::error::PaymentError;
use crate::ids::PaymentIntentId;
use crate::money::{Amount, Currency};

/// Metadata key carrying the caller's user ID on customers and intents.
pub const USER_ID_METADATA_KEY: &str = "userId";

/// Metadata key carrying the static integration label on intents.
pub const INTEGRATION_TYPE_METADATA_KEY: &str = "integration_type";

/// Integration label attached to every payment intent unless overridden.
pub const DEFAULT_INTEGRATION_TYPE: &str = "react-app-shiny-redirect";

/// Body of `POST /api/create-payment-intent`.
///
/// Kept loosely typed so the service can report validation failures in its
/// own error shape; call [`CreatePaymentIntentRequest::into_order`] to validate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentRequest {
    /// Amount in minor currency units.
    pub amount: i64,
    /// Three-letter currency code; the service default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Caller's user ID from the identity provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Caller's email, used to find or create a processor customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CreatePaymentIntentRequest {
    /// Validate the request into a [`PaymentIntentOrder`].
    ///
    /// Blank `email` and `userId` values are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not positive or the currency is not a
    /// three-letter code.
    pub fn into_order(self, default_currency: &Currency) -> Result<PaymentIntentOrder, PaymentError> {
        let amount = Amount::new(self.amount)?;
        let currency = match self.currency {
            Some(code) => code.parse()?,
            None => default_currency.clone(),
        };

        Ok(PaymentIntentOrder {
            amount,
            currency,
            user_id: self.user_id.filter(|s| !s.trim().is_empty()),
            email: self.email.filter(|s| !s.trim().is_empty()),
        })
    }
}

/// A validated request to create a payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentOrder {
    /// Positive amount in minor units.
    pub amount: Amount,
    /// Normalized currency code.
    pub currency: Currency,
    /// Caller's user ID, if known.
    pub user_id: Option<String>,
    /// Caller's email, if known.
    pub email: Option<String>,
}

/// Successful response of `POST /api/create-payment-intent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentResponse {
    /// Secret the browser uses to confirm this specific intent.
    pub client_secret: String,
    /// The created intent's ID.
    pub payment_intent_id: PaymentIntentId,
}

/// Error body returned by the gateway's JSON endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Free-text error message.
    pub error: String,
}
