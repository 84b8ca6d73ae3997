//! Service configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use paybridge_core::{Currency, DEFAULT_INTEGRATION_TYPE};

use crate::stripe::webhook::DEFAULT_TOLERANCE_SECONDS;
use crate::stripe::StripeClient;

/// Port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 4000;

/// Service configuration loaded from environment variables.
#[derive(Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:4000").
    pub listen_addr: String,

    /// Stripe secret API key (optional; payments are unavailable without it).
    pub stripe_secret_key: Option<String>,

    /// Stripe webhook signing secret (optional; webhooks are rejected without it).
    pub stripe_webhook_secret: Option<String>,

    /// Stripe API base URL.
    pub stripe_api_base: String,

    /// Maximum age of a webhook signature in seconds (`0` disables the check).
    pub webhook_tolerance_seconds: u64,

    /// Currency applied when a request does not name one.
    pub default_currency: Currency,

    /// Static label stored in every payment intent's metadata.
    pub integration_type: String,

    /// Serve the prebuilt frontend bundle with SPA fallback.
    pub production: bool,

    /// Directory holding the prebuilt frontend bundle.
    pub frontend_dir: PathBuf,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds, applied to inbound requests and Stripe calls.
    pub request_timeout_seconds: u64,
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("listen_addr", &self.listen_addr)
            .field("stripe_secret_key", &self.stripe_secret_key.as_ref().map(|_| "<redacted>"))
            .field(
                "stripe_webhook_secret",
                &self.stripe_webhook_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("stripe_api_base", &self.stripe_api_base)
            .field("webhook_tolerance_seconds", &self.webhook_tolerance_seconds)
            .field("default_currency", &self.default_currency)
            .field("integration_type", &self.integration_type)
            .field("production", &self.production)
            .field("frontend_dir", &self.frontend_dir)
            .field("cors_origins", &self.cors_origins)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}

/// Stripe secrets file structure.
#[derive(Debug, Deserialize)]
struct StripeSecrets {
    secret_key: String,
    #[serde(default)]
    webhook_secret: Option<String>,
}

/// Locations probed for a Stripe secrets file, in order.
pub const SECRETS_PATHS: [&str; 3] = [
    ".secrets/stripe.json",
    "paybridge/.secrets/stripe.json",
    "../.secrets/stripe.json",
];

/// Load a dotenv file into the process environment.
///
/// `None` searches for `.env` in the working directory and its parents.
/// Variables already set in the environment are not overridden. Returns the
/// path that was loaded.
pub fn load_dotenv(path: Option<&Path>) -> Option<PathBuf> {
    let result = match path {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };

    match result {
        Ok(path) => {
            tracing::info!(path = %path.display(), "Loaded environment file");
            Some(path)
        }
        Err(e) if e.not_found() => {
            tracing::debug!("No environment file found");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unreadable environment file");
            None
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    ///
    /// The first secrets file found in [`SECRETS_PATHS`] takes precedence over
    /// `STRIPE_SECRET_KEY`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_sources(|key| std::env::var(key).ok(), &SECRETS_PATHS)
    }

    /// Load configuration from a variable lookup alone, ignoring secrets files.
    ///
    /// Tests pass a map instead of mutating the process environment.
    #[must_use]
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        Self::from_sources(var, &[] as &[&Path])
    }

    /// Load configuration from a variable lookup and candidate secrets files.
    ///
    /// The first readable file in `secrets_paths` supplies the Stripe secret
    /// key, overriding `STRIPE_SECRET_KEY`. Its `webhook_secret` likewise
    /// overrides `STRIPE_WEBHOOK_SECRET` when present.
    #[must_use]
    pub fn from_sources(
        var: impl Fn(&str) -> Option<String>,
        secrets_paths: &[impl AsRef<Path>],
    ) -> Self {
        let defaults = Self::default();

        let (stripe_secret_key, stripe_webhook_secret) = load_stripe_secrets(&var, secrets_paths);

        let listen_addr = var("LISTEN_ADDR").unwrap_or_else(|| {
            let port = var("PORT")
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT);
            format!("0.0.0.0:{port}")
        });

        let default_currency = match var("DEFAULT_CURRENCY") {
            Some(code) => code.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Ignoring DEFAULT_CURRENCY");
                Currency::default()
            }),
            None => Currency::default(),
        };

        Self {
            listen_addr,
            stripe_secret_key,
            stripe_webhook_secret,
            stripe_api_base: var("STRIPE_API_BASE").unwrap_or(defaults.stripe_api_base),
            webhook_tolerance_seconds: var("STRIPE_WEBHOOK_TOLERANCE_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.webhook_tolerance_seconds),
            default_currency,
            integration_type: var("INTEGRATION_TYPE").unwrap_or(defaults.integration_type),
            production: var("APP_ENV").is_some_and(|env| env.eq_ignore_ascii_case("production")),
            frontend_dir: var("FRONTEND_DIR").map_or(defaults.frontend_dir, PathBuf::from),
            cors_origins: var("CORS_ORIGINS")
                .unwrap_or_else(|| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: var("MAX_BODY_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_bytes),
            request_timeout_seconds: var("REQUEST_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.request_timeout_seconds),
        }
    }
}

/// Load Stripe secrets from the first secrets file found, else the environment.
fn load_stripe_secrets(
    var: &impl Fn(&str) -> Option<String>,
    secrets_paths: &[impl AsRef<Path>],
) -> (Option<String>, Option<String>) {
    for path in secrets_paths {
        let path = path.as_ref();
        if let Ok(secrets) = load_secrets_file::<StripeSecrets>(path) {
            tracing::info!(path = %path.display(), "Loaded Stripe secrets from file");
            return (
                Some(secrets.secret_key),
                secrets
                    .webhook_secret
                    .or_else(|| var("STRIPE_WEBHOOK_SECRET").filter(|s| !s.is_empty())),
            );
        }
    }

    tracing::debug!("Stripe secrets file not found, using environment variables");
    (
        var("STRIPE_SECRET_KEY").filter(|s| !s.is_empty()),
        var("STRIPE_WEBHOOK_SECRET").filter(|s| !s.is_empty()),
    )
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, std::io::Error> {
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: format!("0.0.0.0:{DEFAULT_PORT}"),
            stripe_secret_key: None,
            stripe_webhook_secret: None,
            stripe_api_base: StripeClient::DEFAULT_BASE_URL.into(),
            webhook_tolerance_seconds: DEFAULT_TOLERANCE_SECONDS,
            default_currency: Currency::default(),
            integration_type: DEFAULT_INTEGRATION_TYPE.into(),
            production: false,
            frontend_dir: PathBuf::from("build"),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_variables() {
        let config = ServiceConfig::from_lookup(lookup(&[]));

        assert_eq!(config.listen_addr, "0.0.0.0:4000");
        assert_eq!(config.default_currency.as_str(), "usd");
        assert_eq!(config.integration_type, DEFAULT_INTEGRATION_TYPE);
        assert_eq!(config.webhook_tolerance_seconds, 300);
        assert!(!config.production);
        assert_eq!(config.frontend_dir, PathBuf::from("build"));
    }

    #[test]
    fn port_builds_listen_address() {
        let config = ServiceConfig::from_lookup(lookup(&[("PORT", "8081")]));
        assert_eq!(config.listen_addr, "0.0.0.0:8081");
    }

    #[test]
    fn listen_addr_overrides_port() {
        let config =
            ServiceConfig::from_lookup(lookup(&[("PORT", "8081"), ("LISTEN_ADDR", "127.0.0.1:9000")]));
        assert_eq!(config.listen_addr, "127.0.0.1:9000");
    }

    #[test]
    fn production_flag_is_case_insensitive() {
        let config = ServiceConfig::from_lookup(lookup(&[("APP_ENV", "Production")]));
        assert!(config.production);

        let config = ServiceConfig::from_lookup(lookup(&[("APP_ENV", "staging")]));
        assert!(!config.production);
    }

    #[test]
    fn invalid_default_currency_falls_back_to_usd() {
        let config = ServiceConfig::from_lookup(lookup(&[("DEFAULT_CURRENCY", "dollars")]));
        assert_eq!(config.default_currency.as_str(), "usd");

        let config = ServiceConfig::from_lookup(lookup(&[("DEFAULT_CURRENCY", "EUR")]));
        assert_eq!(config.default_currency.as_str(), "eur");
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config = ServiceConfig::from_lookup(lookup(&[(
            "CORS_ORIGINS",
            "https://a.example, https://b.example",
        )]));
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn lookup_alone_reads_stripe_secrets_from_variables() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("STRIPE_SECRET_KEY", "sk_test_env"),
            ("STRIPE_WEBHOOK_SECRET", "whsec_env"),
        ]));
        assert_eq!(config.stripe_secret_key.as_deref(), Some("sk_test_env"));
        assert_eq!(config.stripe_webhook_secret.as_deref(), Some("whsec_env"));
    }

    #[test]
    fn secrets_file_takes_precedence_over_environment() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("stripe.json");
        std::fs::write(&file, r#"{"secret_key": "sk_test_file"}"#).unwrap();

        let config = ServiceConfig::from_sources(
            lookup(&[
                ("STRIPE_SECRET_KEY", "sk_test_env"),
                ("STRIPE_WEBHOOK_SECRET", "whsec_env"),
            ]),
            &[dir.path().join("missing.json"), file],
        );

        assert_eq!(config.stripe_secret_key.as_deref(), Some("sk_test_file"));
        // No webhook secret in the file, so the variable still applies
        assert_eq!(config.stripe_webhook_secret.as_deref(), Some("whsec_env"));
    }

    #[test]
    fn missing_secrets_files_fall_back_to_environment() {
        let dir = tempfile::tempdir().unwrap();

        let config = ServiceConfig::from_sources(
            lookup(&[("STRIPE_SECRET_KEY", "sk_test_env")]),
            &[dir.path().join("stripe.json")],
        );

        assert_eq!(config.stripe_secret_key.as_deref(), Some("sk_test_env"));
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = ServiceConfig {
            stripe_secret_key: Some("sk_test_secret".into()),
            stripe_webhook_secret: Some("whsec_secret".into()),
            ..ServiceConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk_test_secret"));
        assert!(!debug.contains("whsec_secret"));
    }
}
