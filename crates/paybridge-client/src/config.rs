//! Client configuration.

/// Gateway base URL used when `PAYBRIDGE_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:4000/api";

/// Post-payment redirect used when `REDIRECT_URL` is not set.
pub const DEFAULT_REDIRECT_URL: &str = "https://test.mirant.info";

/// Configuration for the payment screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Gateway API base URL, including the `/api` prefix.
    pub api_url: String,

    /// Stripe publishable key handed to the card-confirmation SDK.
    pub publishable_key: Option<String>,

    /// Where the processor sends the customer after confirmation.
    pub redirect_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            publishable_key: None,
            redirect_url: DEFAULT_REDIRECT_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        Self {
            api_url: non_empty("PAYBRIDGE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            publishable_key: non_empty("STRIPE_PUBLISHABLE_KEY"),
            redirect_url: non_empty("REDIRECT_URL")
                .unwrap_or_else(|| DEFAULT_REDIRECT_URL.to_string()),
        }
    }
}
