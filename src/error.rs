//! Error handling module
//!
//! Centralized HTTP error mapping. Handlers surface their own typed errors;
//! this module converts each of them into a JSON response with a stable
//! error code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::handlers::{CommandError, TransferError, UserError};
use crate::repository::RepositoryError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Transfer not found: {0}")]
    TransferNotFound(Uuid),

    // Command validation
    #[error(transparent)]
    Command(#[from] CommandError),

    // Handler errors - each variant carries its own HTTP status
    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    User(#[from] UserError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            // 400 Bad Request
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", Some(msg.clone()))
            }

            // 404 Not Found
            AppError::TransferNotFound(id) => {
                (StatusCode::NOT_FOUND, "transfer_not_found", Some(id.to_string()))
            }

            // Command validation - always the caller's fault
            AppError::Command(command_err) => match command_err {
                CommandError::NonPositiveAmount(amount) => {
                    (StatusCode::BAD_REQUEST, "invalid_amount", Some(amount.to_string()))
                }
                CommandError::SamePayerPayee => {
                    (StatusCode::BAD_REQUEST, "same_payer_payee", None)
                }
            },

            // Transfer errors - map to appropriate HTTP status
            AppError::Transfer(ref transfer_err) => match transfer_err {
                TransferError::UserNotFound(id) => {
                    (StatusCode::NOT_FOUND, "user_not_found", Some(id.to_string()))
                }
                TransferError::MerchantNotAllowed(id) => {
                    (StatusCode::FORBIDDEN, "merchant_not_allowed", Some(id.to_string()))
                }
                TransferError::InsufficientFunds { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "insufficient_funds", Some(transfer_err.to_string()))
                }
                TransferError::NotAuthorized => {
                    (StatusCode::UNAUTHORIZED, "transfer_not_authorized", None)
                }
                TransferError::Money(e) => {
                    tracing::error!("Money arithmetic error: {:?}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
                }
                TransferError::Repository(e) => {
                    tracing::error!("Storage error: {:?}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
                }
            },

            // User errors
            AppError::User(ref user_err) => match user_err {
                UserError::AlreadyExists => {
                    (StatusCode::CONFLICT, "user_already_exists", None)
                }
                UserError::NotFound(id) => {
                    (StatusCode::NOT_FOUND, "user_not_found", Some(id.to_string()))
                }
                UserError::Document(e) => {
                    (StatusCode::BAD_REQUEST, "invalid_document", Some(e.to_string()))
                }
                UserError::PasswordHash(msg) => {
                    tracing::error!("Password hashing error: {}", msg);
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
                }
                UserError::Repository(RepositoryError::UniqueViolation(_)) => {
                    (StatusCode::CONFLICT, "user_already_exists", None)
                }
                UserError::Repository(e) => {
                    tracing::error!("Storage error: {:?}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
                }
            },
        };

        // 5xx causes are logged above; the body never carries them.
        let error = if status.is_server_error() {
            "Something went wrong, please try again later".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error,
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
