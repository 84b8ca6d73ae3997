//! Common test utilities for paybridge integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum_test::TestServer;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use paybridge_service::{create_router, AppState, ServiceConfig};

/// Webhook signing secret configured on every harness.
pub const WEBHOOK_SECRET: &str = "whsec_test_secret";

/// Test harness: the gateway under test plus a mock Stripe API.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Mock Stripe API the gateway talks to.
    pub stripe: MockServer,
}

impl TestHarness {
    /// Create a harness with Stripe and webhooks configured.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a harness, adjusting the configuration before the router is built.
    pub async fn with_config(customize: impl FnOnce(&mut ServiceConfig)) -> Self {
        let stripe = MockServer::start().await;

        let mut config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            stripe_secret_key: Some("sk_test_xxx".into()),
            stripe_webhook_secret: Some(WEBHOOK_SECRET.into()),
            stripe_api_base: stripe.uri(),
            request_timeout_seconds: 5,
            ..ServiceConfig::default()
        };
        customize(&mut config);

        let state = AppState::new(config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self { server, stripe }
    }

    /// Mock `GET /customers?email=...` returning the given customer IDs.
    pub async fn mock_customer_search(&self, email: &str, customer_ids: &[&str]) {
        let data: Vec<_> = customer_ids
            .iter()
            .map(|id| json!({"id": id, "object": "customer", "email": email}))
            .collect();

        Mock::given(method("GET"))
            .and(path("/customers"))
            .and(query_param("email", email))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "data": data,
                "has_more": false
            })))
            .mount(&self.stripe)
            .await;
    }

    /// Mock `POST /customers`, expecting it to be called `times` times.
    pub async fn mock_customer_create(&self, customer_id: &str, times: u64) {
        Mock::given(method("POST"))
            .and(path("/customers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": customer_id,
                "object": "customer"
            })))
            .expect(times)
            .named("create customer")
            .mount(&self.stripe)
            .await;
    }
}

/// Responds to `POST /payment_intents` with a fresh intent ID per call.
#[derive(Default)]
pub struct SequentialIntents {
    created: AtomicUsize,
}

impl Respond for SequentialIntents {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("pi_test{n:04}");

        ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "object": "payment_intent",
            "amount": 2000,
            "currency": "usd",
            "status": "requires_payment_method",
            "client_secret": format!("{id}_secret_{n}")
        }))
    }
}

/// Whether the form-encoded request body sets `field`.
pub fn form_has_field(request: &Request, field: &str) -> bool {
    String::from_utf8_lossy(&request.body)
        .split('&')
        .any(|pair| pair.split('=').next() == Some(field))
}
