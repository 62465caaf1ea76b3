//! Error type system for the Pokédex backend
//!
//! This module provides:
//! - One error enum covering auth, persistence and upstream failures
//! - HTTP status code mapping
//! - Client-safe messages (internal detail is only ever logged)
//! - Trace IDs linking a response to its log entry

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

tokio::task_local! {
    /// Trace ID of the request being served, scoped by the trace-id middleware
    pub static REQUEST_TRACE_ID: String;
}

/// Main error type for the Pokédex backend
#[derive(Debug, thiserror::Error)]
pub enum DexError {
    // Input errors
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Authentication errors
    #[error("Email is already registered")]
    EmailAlreadyRegistered,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Missing bearer token")]
    MissingToken,

    #[error("Malformed token: {0}")]
    TokenMalformed(String),

    #[error("Token signature does not verify")]
    TokenSignatureInvalid,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Failed to issue token: {0}")]
    TokenIssueError(String),

    // Credential storage errors
    #[error("Stored password hash is malformed: {0}")]
    InvalidHashFormat(String),

    #[error("Password hashing failed: {0}")]
    HashingError(String),

    // System-level errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Upstream error: {0}")]
    UpstreamError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Task error: {0}")]
    TaskError(String),
}

impl DexError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            DexError::InvalidRequest(_) | DexError::ValidationError(_) => StatusCode::BAD_REQUEST,

            // 401 Unauthorized
            DexError::InvalidCredentials
            | DexError::MissingToken
            | DexError::TokenMalformed(_)
            | DexError::TokenSignatureInvalid
            | DexError::TokenExpired => StatusCode::UNAUTHORIZED,

            // 404 Not Found
            DexError::NotFound(_) => StatusCode::NOT_FOUND,

            // 409 Conflict
            DexError::EmailAlreadyRegistered => StatusCode::CONFLICT,

            // 502 Bad Gateway
            DexError::UpstreamError(_) => StatusCode::BAD_GATEWAY,

            // 503 Service Unavailable
            DexError::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            DexError::TokenIssueError(_)
            | DexError::InvalidHashFormat(_)
            | DexError::HashingError(_)
            | DexError::ConfigError(_)
            | DexError::DatabaseError(_)
            | DexError::PoolError(_)
            | DexError::IoError(_)
            | DexError::TaskError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type name for logs
    pub fn error_type(&self) -> &'static str {
        match self {
            DexError::InvalidRequest(_) => "InvalidRequest",
            DexError::ValidationError(_) => "ValidationError",
            DexError::NotFound(_) => "NotFound",
            DexError::EmailAlreadyRegistered => "EmailAlreadyRegistered",
            DexError::InvalidCredentials => "InvalidCredentials",
            DexError::MissingToken => "MissingToken",
            DexError::TokenMalformed(_) => "TokenMalformed",
            DexError::TokenSignatureInvalid => "TokenSignatureInvalid",
            DexError::TokenExpired => "TokenExpired",
            DexError::TokenIssueError(_) => "TokenIssueError",
            DexError::InvalidHashFormat(_) => "InvalidHashFormat",
            DexError::HashingError(_) => "HashingError",
            DexError::ConfigError(_) => "ConfigError",
            DexError::DatabaseError(_) => "DatabaseError",
            DexError::PoolError(_) => "PoolError",
            DexError::Timeout(_) => "Timeout",
            DexError::UpstreamError(_) => "UpstreamError",
            DexError::IoError(_) => "IoError",
            DexError::TaskError(_) => "TaskError",
        }
    }

    /// Error identifier exposed to clients.
    ///
    /// All authorization failures share one identifier so a client cannot
    /// tell which check rejected it.
    pub fn public_error_type(&self) -> &'static str {
        match self.status_code() {
            StatusCode::BAD_REQUEST => self.error_type(),
            StatusCode::NOT_FOUND => "NotFound",
            StatusCode::UNAUTHORIZED => "Unauthorized",
            StatusCode::CONFLICT => "Conflict",
            StatusCode::BAD_GATEWAY => "BadGateway",
            StatusCode::SERVICE_UNAVAILABLE => "ServiceUnavailable",
            _ => "InternalError",
        }
    }

    /// Message exposed to clients. Never carries internal detail.
    pub fn public_message(&self) -> String {
        match self {
            DexError::InvalidRequest(_) | DexError::ValidationError(_) | DexError::NotFound(_) => {
                self.to_string()
            }
            DexError::EmailAlreadyRegistered | DexError::InvalidCredentials => self.to_string(),
            DexError::MissingToken
            | DexError::TokenMalformed(_)
            | DexError::TokenSignatureInvalid
            | DexError::TokenExpired => "Authentication required".to_string(),
            DexError::UpstreamError(_) => "Pokédex service is unavailable".to_string(),
            DexError::Timeout(_) => "Service temporarily unavailable".to_string(),
            _ => "Internal server error".to_string(),
        }
    }

    /// True for errors caused by the server rather than the caller
    pub fn is_internal(&self) -> bool {
        self.status_code().is_server_error()
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
    /// Create a new error response carrying the current request's trace ID,
    /// or a fresh one outside of a request
    pub fn new(error: String, message: String) -> Self {
        let trace_id = REQUEST_TRACE_ID
            .try_with(|id| id.clone())
            .unwrap_or_else(|_| Uuid::new_v4().to_string());

        Self {
            error,
            message,
            trace_id,
        }
    }

    /// Create the client-facing response for a DexError
    pub fn from_error(error: &DexError) -> Self {
        Self::new(
            error.public_error_type().to_string(),
            error.public_message(),
        )
    }
}

/// Implement IntoResponse for DexError to enable automatic error handling in Axum
impl IntoResponse for DexError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let error_response = ErrorResponse::from_error(&self);

        if self.is_internal() {
            tracing::error!(
                error_type = self.error_type(),
                trace_id = %error_response.trace_id,
                status_code = %status_code,
                "Request failed: {}",
                self
            );
        } else {
            tracing::warn!(
                error_type = self.error_type(),
                trace_id = %error_response.trace_id,
                status_code = %status_code,
                "Request rejected: {}",
                self
            );
        }

        (status_code, Json(error_response)).into_response()
    }
}

/// Result type alias for operations that can fail with DexError
pub type Result<T> = std::result::Result<T, DexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            DexError::ValidationError("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DexError::EmailAlreadyRegistered.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            DexError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            DexError::TokenExpired.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            DexError::InvalidHashFormat("test".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            DexError::DatabaseError(rusqlite::Error::InvalidQuery).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            DexError::UpstreamError("test".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_token_errors_are_indistinguishable_to_clients() {
        let errors = [
            DexError::MissingToken,
            DexError::TokenMalformed("bad base64".into()),
            DexError::TokenSignatureInvalid,
            DexError::TokenExpired,
        ];

        for error in &errors {
            let response = ErrorResponse::from_error(error);
            assert_eq!(response.error, "Unauthorized");
            assert_eq!(response.message, "Authentication required");
        }
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let error = DexError::InvalidHashFormat("row 7 holds garbage".into());
        let response = ErrorResponse::from_error(&error);

        assert_eq!(response.error, "InternalError");
        assert_eq!(response.message, "Internal server error");
        assert!(!response.message.contains("row 7"));
        assert!(!response.trace_id.is_empty());
    }

    #[test]
    fn test_validation_detail_is_echoed() {
        let error = DexError::ValidationError("email must contain '@'".into());
        let response = ErrorResponse::from_error(&error);

        assert_eq!(response.error, "ValidationError");
        assert!(response.message.contains("email must contain"));
    }

    #[tokio::test]
    async fn test_into_response_uses_status_and_body() {
        let response = DexError::EmailAlreadyRegistered.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.error, "Conflict");
        assert_eq!(parsed.message, "Email is already registered");
    }
}
