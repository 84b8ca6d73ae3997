//! Stripe webhook signature verification.
//!
//! Stripe signs every delivery with the endpoint's signing secret and sends
//! the result in the `Stripe-Signature` header:
//!
//! ```text
//! Stripe-Signature: t=1492774577,v1=5257a869e7ec...,v1=6ffbb59b2300...
//! ```
//!
//! The `v1` value is `hex(HMAC-SHA256(secret, "{t}.{raw body}"))`. More than one
//! `v1` entry appears while a secret is being rolled; any match is accepted.
//! The body must be the exact bytes received, never a re-serialized value.

use chrono::Utc;

use super::types::WebhookEvent;
use crate::crypto::{constant_time_eq, hmac_sha256_hex};

/// Name of the header carrying the signature.
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Default maximum age of a signature, matching Stripe's own libraries.
pub const DEFAULT_TOLERANCE_SECONDS: u64 = 300;

/// Signature scheme this verifier understands.
const EXPECTED_SCHEME: &str = "v1";

/// Reasons a webhook delivery is rejected.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The request carried no `Stripe-Signature` header.
    #[error("No stripe-signature header value was provided.")]
    MissingHeader,

    /// The header has no parseable timestamp.
    #[error("Unable to extract timestamp and signatures from header")]
    MalformedHeader,

    /// The header has a timestamp but no `v1` signature.
    #[error("No signatures found with expected scheme v1")]
    NoSignatures,

    /// None of the `v1` signatures match the payload.
    #[error(
        "No signatures found matching the expected signature for payload. \
         Are you passing the raw request body you received from Stripe?"
    )]
    SignatureMismatch,

    /// The signature is older than the configured tolerance.
    #[error("Timestamp outside the tolerance zone (timestamp={timestamp}, now={now})")]
    TimestampOutsideTolerance {
        /// Timestamp from the header.
        timestamp: i64,
        /// Verification time.
        now: i64,
    },

    /// The service has no signing secret to verify with.
    #[error("Webhook signing secret is not configured")]
    SecretNotConfigured,

    /// The verified body is not a Stripe event.
    #[error("Invalid event payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// Verifies `Stripe-Signature` headers against a signing secret.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: String,
    tolerance_seconds: u64,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"<redacted>")
            .field("tolerance_seconds", &self.tolerance_seconds)
            .finish()
    }
}

impl WebhookVerifier {
    /// Create a verifier.
    ///
    /// # Arguments
    ///
    /// * `secret` - Endpoint signing secret (`whsec_...`)
    /// * `tolerance_seconds` - Maximum signature age; `0` disables the age check
    pub fn new(secret: impl Into<String>, tolerance_seconds: u64) -> Self {
        Self {
            secret: secret.into(),
            tolerance_seconds,
        }
    }

    /// Verify the signature header for `payload` as of `now` (Unix seconds).
    ///
    /// # Errors
    ///
    /// Returns a [`WebhookError`] describing why the header does not vouch for
    /// the payload.
    pub fn verify(&self, payload: &[u8], header: &str, now: i64) -> Result<(), WebhookError> {
        let parsed = SignatureHeader::parse(header)?;

        let expected = compute_signature(&self.secret, parsed.timestamp, payload);
        let matched = parsed
            .signatures
            .iter()
            .any(|sig| constant_time_eq(&expected, sig));

        if !matched {
            return Err(WebhookError::SignatureMismatch);
        }

        if self.tolerance_seconds > 0 {
            let age = now.saturating_sub(parsed.timestamp);
            if age > i64::try_from(self.tolerance_seconds).unwrap_or(i64::MAX) {
                return Err(WebhookError::TimestampOutsideTolerance {
                    timestamp: parsed.timestamp,
                    now,
                });
            }
        }

        Ok(())
    }

    /// Verify a delivery and parse it into an event.
    ///
    /// The payload is only parsed after the signature checks out.
    ///
    /// # Errors
    ///
    /// Returns an error if the header is missing or invalid, or the verified
    /// body is not an event.
    pub fn construct_event(
        &self,
        payload: &[u8],
        header: Option<&str>,
    ) -> Result<WebhookEvent, WebhookError> {
        let header = header.ok_or(WebhookError::MissingHeader)?;
        self.verify(payload, header, Utc::now().timestamp())?;
        Ok(serde_json::from_slice(payload)?)
    }
}

/// Parsed form of a `Stripe-Signature` header.
#[derive(Debug)]
struct SignatureHeader<'a> {
    timestamp: i64,
    signatures: Vec<&'a str>,
}

impl<'a> SignatureHeader<'a> {
    fn parse(header: &'a str) -> Result<Self, WebhookError> {
        let mut timestamp = None;
        let mut signatures = Vec::new();

        for part in header.split(',') {
            let mut kv = part.trim().splitn(2, '=');
            match (kv.next(), kv.next()) {
                (Some("t"), Some(ts)) => timestamp = ts.parse::<i64>().ok(),
                (Some(EXPECTED_SCHEME), Some(sig)) => signatures.push(sig),
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or(WebhookError::MalformedHeader)?;
        if signatures.is_empty() {
            return Err(WebhookError::NoSignatures);
        }

        Ok(Self {
            timestamp,
            signatures,
        })
    }
}

/// Compute the hex `v1` signature for `payload` signed at `timestamp`.
#[must_use]
pub fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let timestamp = timestamp.to_string();
    hmac_sha256_hex(secret, &[timestamp.as_bytes(), b".", payload])
}

/// Build a complete `Stripe-Signature` header value, as Stripe would send it.
///
/// Useful for replaying captured events locally and in tests.
#[must_use]
pub fn signature_header(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    format!(
        "t={timestamp},{EXPECTED_SCHEME}={}",
        compute_signature(secret, timestamp, payload)
    )
}
