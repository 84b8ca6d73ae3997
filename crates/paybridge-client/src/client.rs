//! Paybridge gateway HTTP client implementation.

use reqwest::Client;
use std::time::Duration;

use paybridge_core::{CreatePaymentIntentRequest, CreatePaymentIntentResponse, ErrorResponse};

use crate::error::ClientError;

/// Paybridge gateway API client.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    /// Create a new gateway client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the gateway API, including the `/api`
    ///   prefix (e.g., `"http://localhost:4000/api"`)
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new gateway client with custom options.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .map_err(|e| ClientError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Ask the gateway for a new payment intent.
    ///
    /// Each call creates a distinct intent.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the gateway returns an error.
    pub async fn create_payment_intent(
        &self,
        request: &CreatePaymentIntentRequest,
    ) -> Result<CreatePaymentIntentResponse, ClientError> {
        let url = format!("{}/create-payment-intent", self.base_url);

        let response = self.client.post(&url).json(request).send().await?;

        Self::handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => format!("HTTP {status}"),
        };

        Err(ClientError::Api {
            message,
            status: status.as_u16(),
        })
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> CreatePaymentIntentRequest {
        CreatePaymentIntentRequest {
            amount: 2000,
            currency: Some("usd".into()),
            user_id: Some("alice".into()),
            email: Some("a@x.com".into()),
        }
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = GatewayClient::new("http://localhost:4000/api/").unwrap();
        assert_eq!(client.base_url, "http://localhost:4000/api");
    }

    #[tokio::test]
    async fn create_payment_intent_posts_camel_case_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/create-payment-intent"))
            .and(body_json(json!({
                "amount": 2000,
                "currency": "usd",
                "userId": "alice",
                "email": "a@x.com"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "clientSecret": "pi_1_secret_2",
                "paymentIntentId": "pi_1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GatewayClient::new(format!("{}/api", server.uri())).unwrap();
        let response = client.create_payment_intent(&request()).await.unwrap();

        assert_eq!(response.client_secret, "pi_1_secret_2");
        assert_eq!(response.payment_intent_id.as_str(), "pi_1");
    }

    #[tokio::test]
    async fn gateway_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/create-payment-intent"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"error": "Your card was declined."})),
            )
            .mount(&server)
            .await;

        let client = GatewayClient::new(format!("{}/api", server.uri())).unwrap();
        let err = client.create_payment_intent(&request()).await.unwrap_err();

        assert!(matches!(
            err,
            ClientError::Api { status: 500, ref message } if message == "Your card was declined."
        ));
    }

    #[tokio::test]
    async fn non_json_error_falls_back_to_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/create-payment-intent"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let client = GatewayClient::new(format!("{}/api", server.uri())).unwrap();
        let err = client.create_payment_intent(&request()).await.unwrap_err();

        assert!(err.to_string().contains("502"));
    }
}
