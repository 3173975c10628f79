//! Unified application error type for HTTP handlers.

use std::sync::Arc;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::checkout::AddressErrors;
use crate::services::{DelhiveryError, RazorpayError};

/// Application error type that converts to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Payment gateway call failed. `Arc` because the order store shares one
    /// failure between requests that coalesced on the same receipt.
    #[error("Gateway error: {0}")]
    Gateway(#[source] Arc<RazorpayError>),

    /// Logistics provider call failed.
    #[error("Logistics error: {0}")]
    Logistics(#[from] DelhiveryError),

    /// Request failed field validation.
    #[error("Validation failed")]
    Validation(AddressErrors),

    /// Malformed request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request contradicts existing state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Gateway(_) | Self::Logistics(_) => StatusCode::BAD_GATEWAY,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %self, "request failed");
            sentry::capture_error(&self);
        }

        let body = match &self {
            Self::Validation(errors) => json!({ "errors": errors }),
            Self::NotFound(message) => json!({ "error": message }),
            // Upstream failure details stay in the logs, not the response
            Self::Gateway(_) => json!({ "error": "Payment gateway unavailable" }),
            Self::Logistics(_) => json!({ "error": "Shipping provider unavailable" }),
            Self::BadRequest(message) | Self::Conflict(message) => json!({ "error": message }),
            Self::Internal(_) => json!({ "error": "Internal server error" }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<AddressErrors> for AppError {
    fn from(errors: AddressErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<RazorpayError> for AppError {
    fn from(error: RazorpayError) -> Self {
        Self::Gateway(Arc::new(error))
    }
}

impl From<Arc<RazorpayError>> for AppError {
    fn from(error: Arc<RazorpayError>) -> Self {
        Self::Gateway(error)
    }
}
