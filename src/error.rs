//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error(transparent)]
    Malformed(#[from] crate::tabular::ParseError),

    #[error("Match not found: {0}")]
    MatchNotFound(Uuid),

    #[error("Athlete not found: {0}")]
    AthleteNotFound(Uuid),

    #[error("Match belongs to another team: {0}")]
    ForeignMatch(Uuid),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] crate::domain::DomainError),

    // Server errors (5xx)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Sheet encoding error: {0}")]
    Sheet(#[from] csv::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
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
            AppError::Malformed(e) => (
                StatusCode::BAD_REQUEST,
                "malformed_input",
                Some(e.to_string()),
            ),

            // 403 Forbidden
            AppError::ForeignMatch(id) => {
                (StatusCode::FORBIDDEN, "foreign_match", Some(id.to_string()))
            }

            // 404 Not Found
            AppError::MatchNotFound(id) => (
                StatusCode::NOT_FOUND,
                "match_not_found",
                Some(id.to_string()),
            ),
            AppError::AthleteNotFound(id) => (
                StatusCode::NOT_FOUND,
                "athlete_not_found",
                Some(id.to_string()),
            ),

            // Domain errors - map to appropriate HTTP status
            AppError::Domain(ref domain_err) => {
                use crate::domain::DomainError;
                match domain_err {
                    DomainError::LimitExceeded { .. } => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "disciplinary_limit_exceeded",
                        Some(domain_err.to_string()),
                    ),
                    DomainError::NegativeStat { .. } => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "negative_stat",
                        Some(domain_err.to_string()),
                    ),
                }
            }

            // 500 Internal Server Error
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Sheet(e) => {
                tracing::error!("Sheet encoding error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "sheet_error", None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
            AppError::Config(e) => {
                tracing::error!("Config error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error", None)
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
