//! Stripe API client implementation.

use reqwest::Client;
use std::time::Duration;

use paybridge_core::{INTEGRATION_TYPE_METADATA_KEY, USER_ID_METADATA_KEY};

use super::types::{Customer, PaymentIntent, PaymentIntentParams, StripeErrorResponse, StripeList};

/// Error type for Stripe operations.
#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe API returned an error.
    #[error("Stripe API error: {error_type} - {message}")]
    Api {
        /// Error type.
        error_type: String,
        /// Error message.
        message: String,
        /// Error code.
        code: Option<String>,
        /// HTTP status returned by Stripe.
        status: u16,
    },

    /// A successful response lacked a field this service depends on.
    #[error("Stripe response missing field: {0}")]
    MissingField(&'static str),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl StripeError {
    /// The message to show callers: Stripe's own text for API errors, the
    /// transport error otherwise.
    #[must_use]
    pub fn processor_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::Http(_) | Self::MissingField(_) => self.to_string(),
            Self::Configuration(msg) => msg.clone(),
        }
    }
}

/// Stripe API client.
#[derive(Clone)]
pub struct StripeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl StripeClient {
    /// Stripe API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.stripe.com/v1";

    /// Create a new Stripe client against the public API.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Stripe secret API key (`sk_test_...` or `sk_live_...`)
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, StripeError> {
        Self::with_options(api_key, Self::DEFAULT_BASE_URL, Duration::from_secs(30))
    }

    /// Create a new Stripe client with a custom base URL and request timeout.
    ///
    /// The base URL lets the service talk to `stripe-mock` or a test double.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the HTTP client cannot be built.
    pub fn with_options(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StripeError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(StripeError::Configuration("Stripe API key is empty".into()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StripeError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// List customers whose email matches exactly.
    ///
    /// Emails are not unique in Stripe; callers that need a single customer
    /// take the first entry.
    pub async fn list_customers_by_email(
        &self,
        email: &str,
    ) -> Result<StripeList<Customer>, StripeError> {
        let response = self
            .client
            .get(format!("{}/customers", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .query(&[("email", email)])
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Create a new Stripe customer.
    ///
    /// # Arguments
    ///
    /// * `email` - Customer email
    /// * `user_id` - Our caller's user ID (stored as metadata when present)
    pub async fn create_customer(
        &self,
        email: &str,
        user_id: Option<&str>,
    ) -> Result<Customer, StripeError> {
        let user_id_key = format!("metadata[{USER_ID_METADATA_KEY}]");

        let mut params = vec![("email", email.to_string())];
        if let Some(user_id) = user_id {
            params.push((user_id_key.as_str(), user_id.to_string()));
        }

        let response = self
            .client
            .post(format!("{}/customers", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Create a payment intent with automatic payment methods enabled.
    ///
    /// No idempotency key is sent: every call creates a new intent.
    pub async fn create_payment_intent(
        &self,
        params: &PaymentIntentParams<'_>,
    ) -> Result<PaymentIntent, StripeError> {
        let user_id_key = format!("metadata[{USER_ID_METADATA_KEY}]");
        let integration_key = format!("metadata[{INTEGRATION_TYPE_METADATA_KEY}]");

        let mut form = vec![
            ("amount", params.amount.to_string()),
            ("currency", params.currency.to_string()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
            (integration_key.as_str(), params.integration_type.to_string()),
        ];
        if let Some(customer) = params.customer {
            form.push(("customer", customer.to_string()));
        }
        if let Some(user_id) = params.user_id {
            form.push((user_id_key.as_str(), user_id.to_string()));
        }

        tracing::debug!(
            amount = %params.amount,
            currency = %params.currency,
            customer = ?params.customer,
            "Creating Stripe payment intent"
        );

        let response = self
            .client
            .post(format!("{}/payment_intents", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&form)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StripeError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let error_body: Result<StripeErrorResponse, _> = response.json().await;

        match error_body {
            Ok(stripe_error) => Err(StripeError::Api {
                message: stripe_error
                    .error
                    .message
                    .unwrap_or_else(|| format!("HTTP {status}")),
                error_type: stripe_error.error.error_type,
                code: stripe_error.error.code,
                status: status.as_u16(),
            }),
            Err(_) => Err(StripeError::Api {
                error_type: "unknown".to_string(),
                message: format!("HTTP {status}"),
                code: None,
                status: status.as_u16(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paybridge_core::{Amount, Currency};
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> StripeClient {
        StripeClient::with_options("sk_test_xxx", server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let err = StripeClient::new("  ").unwrap_err();
        assert!(matches!(err, StripeError::Configuration(_)));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client =
            StripeClient::with_options("sk_test_xxx", "http://localhost:12111/v1/", Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.base_url, "http://localhost:12111/v1");
    }

    #[test]
    fn debug_redacts_api_key() {
        let client = StripeClient::new("sk_test_secret").unwrap();
        assert!(!format!("{client:?}").contains("sk_test_secret"));
    }

    #[tokio::test]
    async fn list_customers_sends_email_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customers"))
            .and(query_param("email", "a@x.com"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "data": [{"id": "cus_1", "email": "a@x.com"}],
                "has_more": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let customers = client_for(&server)
            .list_customers_by_email("a@x.com")
            .await
            .unwrap();

        assert_eq!(customers.data.len(), 1);
        assert_eq!(customers.data[0].id.as_str(), "cus_1");
    }

    #[tokio::test]
    async fn create_customer_tags_user_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/customers"))
            .and(body_string_contains("email=a%40x.com"))
            .and(body_string_contains("metadata%5BuserId%5D=alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cus_new",
                "email": "a@x.com",
                "metadata": {"userId": "alice"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let customer = client_for(&server)
            .create_customer("a@x.com", Some("alice"))
            .await
            .unwrap();

        assert_eq!(customer.id.as_str(), "cus_new");
        assert_eq!(customer.metadata["userId"], "alice");
    }

    #[tokio::test]
    async fn create_payment_intent_sends_expected_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payment_intents"))
            .and(body_string_contains("amount=2000"))
            .and(body_string_contains("currency=usd"))
            .and(body_string_contains("customer=cus_1"))
            .and(body_string_contains("automatic_payment_methods%5Benabled%5D=true"))
            .and(body_string_contains(
                "metadata%5Bintegration_type%5D=react-app-shiny-redirect",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pi_1",
                "amount": 2000,
                "currency": "usd",
                "customer": "cus_1",
                "status": "requires_payment_method",
                "client_secret": "pi_1_secret_abc"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let currency = Currency::default();
        let customer = "cus_1".parse().unwrap();
        let params = PaymentIntentParams {
            amount: Amount::new(2000).unwrap(),
            currency: &currency,
            customer: Some(&customer),
            user_id: None,
            integration_type: "react-app-shiny-redirect",
        };

        let intent = client_for(&server)
            .create_payment_intent(&params)
            .await
            .unwrap();

        assert_eq!(intent.id.as_str(), "pi_1");
        assert_eq!(intent.client_secret.as_deref(), Some("pi_1_secret_abc"));
    }

    #[tokio::test]
    async fn api_errors_carry_stripe_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payment_intents"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "type": "invalid_request_error",
                    "code": "amount_too_small",
                    "message": "Amount must be at least $0.50 usd"
                }
            })))
            .mount(&server)
            .await;

        let currency = Currency::default();
        let params = PaymentIntentParams {
            amount: Amount::new(1).unwrap(),
            currency: &currency,
            customer: None,
            user_id: None,
            integration_type: "test",
        };

        let err = client_for(&server)
            .create_payment_intent(&params)
            .await
            .unwrap_err();

        assert_eq!(err.processor_message(), "Amount must be at least $0.50 usd");
        assert!(matches!(
            err,
            StripeError::Api { status: 400, ref code, .. } if code.as_deref() == Some("amount_too_small")
        ));
    }

    #[tokio::test]
    async fn non_json_errors_fall_back_to_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customers"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_customers_by_email("a@x.com")
            .await
            .unwrap_err();

        assert!(err.processor_message().contains("429"));
    }
}
