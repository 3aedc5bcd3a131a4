//! Error handling for the EkoTregu marketplace backend
//!
//! Provides consistent error responses in English and Albanian

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
        message_sq: String,
    },

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_sq: String,
    },

    // Deliberately ambiguous: a caller must not be able to tell a listing
    // that does not exist apart from one owned by somebody else.
    #[error("Listing not found or not authorized")]
    NotFoundOrUnauthorized,

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_sq: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "TOKEN_EXPIRED".to_string(),
                    message_en: "Token has expired".to_string(),
                    message_sq: "Sesioni ka skaduar".to_string(),
                    field: None,
                },
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "INVALID_TOKEN".to_string(),
                    message_en: "Invalid token".to_string(),
                    message_sq: "Token i pavlefshëm".to_string(),
                    field: None,
                },
            ),
            AppError::Unauthorized { message, message_sq } => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "UNAUTHORIZED".to_string(),
                    message_en: message.clone(),
                    message_sq: message_sq.clone(),
                    field: None,
                },
            ),
            AppError::Validation { field, message, message_sq } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_sq: message_sq.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFoundOrUnauthorized => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND_OR_UNAUTHORIZED".to_string(),
                    message_en: "Listing not found or you are not authorized to modify it"
                        .to_string(),
                    message_sq: "Shpallja nuk u gjet ose nuk keni të drejtë ta ndryshoni"
                        .to_string(),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message_en: "A database error occurred".to_string(),
                    message_sq: "Ndodhi një gabim në bazën e të dhënave".to_string(),
                    field: None,
                },
            ),
        };

        // Rejected requests are expected traffic, not server errors
        match &self {
            AppError::DatabaseError(_) => {
                tracing::error!("Error: {:?}", self);
            }
            _ => {
                tracing::debug!("Request rejected: {:?}", self);
            }
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;
