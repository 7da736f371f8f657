//! Error type system for the text refiner
//!
//! This module provides:
//! - A single error enum covering request validation, model and transport failures
//! - HTTP status code mapping
//! - JSON error bodies with trace IDs
//! - Context chaining for operation-prefixed messages

use crate::api::middleware::current_trace_id;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Main error type for the text refiner
#[derive(Debug, thiserror::Error)]
pub enum RefinerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Request errors
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    // Model errors
    #[error("Gemini API error: {0}")]
    ModelError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// Catch-all for a failed endpoint operation; carries the full message
    #[error("{0}")]
    Internal(String),
}

impl RefinerError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RefinerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,

            RefinerError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,

            RefinerError::ConfigError(_)
            | RefinerError::ModelError(_)
            | RefinerError::NetworkError(_)
            | RefinerError::DeserializationError(_)
            | RefinerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type name for API responses
    pub fn error_type(&self) -> &'static str {
        match self {
            RefinerError::ConfigError(_) => "ConfigError",
            RefinerError::InvalidRequest(_) => "InvalidRequest",
            RefinerError::ValidationError(_) => "ValidationError",
            RefinerError::ModelError(_) => "ModelError",
            RefinerError::NetworkError(_) => "NetworkError",
            RefinerError::DeserializationError(_) => "DeserializationError",
            RefinerError::Internal(_) => "InternalError",
        }
    }

    /// Whether the error was caused by the client rather than the model call
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Error response structure for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique trace ID for this error
    pub trace_id: String,
}

impl ErrorResponse {
    /// Create a new error response tagged with the current request's trace ID,
    /// or a fresh one outside of a request
    pub fn new(error: String, message: String) -> Self {
        Self::with_trace_id(error, message, current_or_new_trace_id())
    }

    /// Create a new error response with a specific trace ID
    pub fn with_trace_id(error: String, message: String, trace_id: String) -> Self {
        Self {
            error,
            message,
            trace_id,
        }
    }

    /// Create an error response from a RefinerError
    pub fn from_error(error: &RefinerError) -> Self {
        Self::new(error.error_type().to_string(), error.to_string())
    }
}

fn current_or_new_trace_id() -> String {
    current_trace_id().unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Implement IntoResponse for RefinerError to enable automatic error handling in Axum
impl IntoResponse for RefinerError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let error_response = ErrorResponse::from_error(&self);

        if self.is_client_error() {
            tracing::warn!(
                error_type = self.error_type(),
                trace_id = %error_response.trace_id,
                status_code = %status_code,
                "Request rejected: {}",
                self
            );
        } else {
            tracing::error!(
                error_type = self.error_type(),
                trace_id = %error_response.trace_id,
                status_code = %status_code,
                "Request failed: {}",
                self
            );
        }

        (status_code, Json(error_response)).into_response()
    }
}

/// Result type alias for operations that can fail with RefinerError
pub type Result<T> = std::result::Result<T, RefinerError>;

/// Context extension trait for prefixing errors with the failed operation
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ErrorContext<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| wrap(e, context.into()))
    }
}

// Client errors keep their own status; everything else becomes a 500 with the
// operation prefixed to the underlying message.
fn wrap(error: RefinerError, context: String) -> RefinerError {
    if error.is_client_error() {
        error
    } else {
        RefinerError::Internal(format!("{}: {}", context, error))
    }
}
