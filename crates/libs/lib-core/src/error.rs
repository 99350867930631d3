//! # Request Error Handling
//!
//! This module defines [`AppError`], the closed set of failure kinds a request can
//! end in. Every handler returns `Result<_, AppError>`; the variant is chosen where
//! the failure happens, never guessed later from an error message.
//!
//! ## Error Kinds
//!
//! | Variant | Cause | HTTP Status |
//! |---------|-------|-------------|
//! | [`Validation`](AppError::Validation) | malformed or missing request fields | 400 Bad Request |
//! | [`Authentication`](AppError::Authentication) | wrong password, undecryptable keystore | 401 Unauthorized |
//! | [`Blockchain`](AppError::Blockchain) | any hotel client failure, including timeouts | 502 Bad Gateway |
//! | [`Internal`](AppError::Internal) | unexpected shapes, unreadable keystore file | 500 Internal Server Error |
//!
//! ## Response Body
//!
//! ```json
//! { "error": "password: length", "code": "ValidationError" }
//! ```
//!
//! Internal errors are reported with a generic message; the detail only goes to
//! the server log.
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_core::error::{AppError, Result};
//!
//! fn first_hash(hashes: &[String]) -> Result<&String> {
//!     hashes
//!         .first()
//!         .ok_or_else(|| AppError::Internal("transaction emitted no logs".to_string()))
//! }
//! ```

use crate::dto::ErrorResponse;
use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Failure kinds a request can end in.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body or path parameters do not have the required shape.
    ///
    /// Raised before any keystore or ledger work happens.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The password does not unlock the keystore, or the keystore is malformed.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The hotel client failed: unreachable node, reverted transaction,
    /// malformed address, missing signer or timeout.
    #[error("Blockchain error: {0}")]
    Blockchain(String),

    /// Unexpected failure inside the service.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Blockchain(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code sent in the `code` field.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "ValidationError",
            AppError::Authentication(_) => "AuthenticationError",
            AppError::Blockchain(_) => "BlockchainError",
            AppError::Internal(_) => "InternalError",
        }
    }

    /// Message safe to show to the caller.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::Authentication(msg) | AppError::Blockchain(msg) => {
                msg.clone()
            }
            AppError::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(code = self.code(), "Server error: {}", self);
        } else {
            tracing::debug!(code = self.code(), "Client error: {}", self);
        }

        let body = Json(ErrorResponse {
            error: self.user_message(),
            code: self.code().to_string(),
        });

        (status, body).into_response()
    }
}

impl From<axum::extract::rejection::PathRejection> for AppError {
    fn from(rejection: axum::extract::rejection::PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Authentication("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Blockchain("x".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            AppError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err = AppError::Internal("keystore at /secret/path unreadable".to_string());
        assert_eq!(err.user_message(), "An internal error occurred");
        assert_eq!(err.code(), "InternalError");
    }

    #[tokio::test]
    async fn test_response_body_shape() {
        let response = AppError::Blockchain("execution reverted".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(
            parsed,
            ErrorResponse {
                error: "execution reverted".to_string(),
                code: "BlockchainError".to_string(),
            }
        );
    }
}
