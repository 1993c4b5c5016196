//! Application error handling

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use clara_core::DomainError;
use serde::Serialize;

/// Application error type, mapped to an HTTP status plus a JSON error body
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed required field → 400
    BadRequest(String),
    /// No registered patient for the presented session → 401
    Unauthorized(String),
    /// No matching record → 404
    NotFound(String),
    /// Document-store or language-model failure → 500 with detail echoed
    Upstream(String),
    /// Missing configuration or other internal failure → 500
    Internal(String),
}

/// JSON error body: `{error, details?}`
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody { error: msg, details: None },
            ),
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorBody { error: msg, details: None },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody { error: msg, details: None },
            ),
            AppError::Upstream(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: "Error al procesar la solicitud".to_string(),
                    details: Some(details),
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody { error: msg, details: None },
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<deadpool_postgres::PoolError> for AppError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        AppError::Upstream(format!("Database pool error: {}", err))
    }
}

impl From<tokio_postgres::Error> for AppError {
    fn from(err: tokio_postgres::Error) -> Self {
        AppError::Upstream(format!("Database error: {}", err))
    }
}
