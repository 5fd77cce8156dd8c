// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.
//!
//! Error codes follow the callable-function vocabulary the web client
//! already understands (`invalid-argument`, `not-found`, ...).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-field validation messages, keyed by the client's field name.
pub type FieldErrors = BTreeMap<String, String>;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),

    /// Carries the client-facing message; callers log the transport cause.
    #[error("Mail delivery error: {0}")]
    Mail(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Callable error code reported to clients.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthenticated | AppError::InvalidToken => "unauthenticated",
            AppError::PermissionDenied(_) => "permission-denied",
            AppError::NotFound(_) => "not-found",
            AppError::InvalidArgument(_) | AppError::Validation(_) => "invalid-argument",
            AppError::DeadlineExceeded(_) => "deadline-exceeded",
            AppError::Mail(_) | AppError::Database(_) | AppError::Internal(_) => "internal",
        }
    }

    /// Single-field validation failure.
    pub fn field(field: &str, message: &str) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), message.to_string());
        AppError::Validation(fields)
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<FieldErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, details, fields) = match self {
            AppError::Unauthenticated | AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, None, None)
            }
            AppError::PermissionDenied(msg) => (StatusCode::FORBIDDEN, Some(msg), None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, Some(msg), None),
            AppError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, Some(msg), None),
            AppError::Validation(fields) => (StatusCode::UNPROCESSABLE_ENTITY, None, Some(fields)),
            AppError::DeadlineExceeded(msg) => (StatusCode::GONE, Some(msg), None),
            AppError::Mail(msg) => {
                tracing::error!(error = %msg, "Mail delivery error");
                (StatusCode::INTERNAL_SERVER_ERROR, Some(msg), None)
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, None, None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, None, None)
            }
        };

        let body = ErrorResponse {
            error: code.to_string(),
            details,
            fields,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
