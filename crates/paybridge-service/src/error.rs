//! API error types and responses.
//!
//! JSON endpoints answer `{"error": "<message>"}` with status 500 for every
//! failure, local validation included. The webhook endpoint answers plain
//! text with status 400. Callers match on status and message only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use paybridge_core::{ErrorResponse, PaymentError};

use crate::stripe::{StripeError, WebhookError};

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Invalid input rejected before any processor call.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The payment processor rejected or failed the call.
    #[error("processor error: {0}")]
    Processor(#[from] StripeError),

    /// A required integration is not configured.
    #[error("not configured: {0}")]
    NotConfigured(&'static str),

    /// Webhook delivery failed verification.
    #[error("webhook error: {0}")]
    Webhook(#[from] WebhookError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidRequest(message) => json_error(StatusCode::INTERNAL_SERVER_ERROR, message),
            Self::Processor(err) => {
                json_error(StatusCode::INTERNAL_SERVER_ERROR, err.processor_message())
            }
            Self::NotConfigured(what) => {
                tracing::error!(missing = what, "Request needs an unconfigured integration");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, format!("{what} not configured"))
            }
            Self::Webhook(err) => {
                (StatusCode::BAD_REQUEST, format!("Webhook Error: {err}")).into_response()
            }
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

fn json_error(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}
