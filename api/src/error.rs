//! Unified error types for the Pairwise API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business logic errors
//! - `RosterError`: Roster lookup client errors
//! - `IdentityError`: ID token verification errors
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message shown when a voter submits a pair they already ranked
pub const ALREADY_RANKED_MESSAGE: &str = "You've already ranked this pair.";

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Entity already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Daily vote limit reached: {0}")]
    QuotaExceeded(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Roster lookup client errors
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Roster API key not configured")]
    NotConfigured,

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// ID token verification errors
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token carries no email claim")]
    MissingEmail,

    #[error("Identity provider error: {status} - {message}")]
    Provider { status: u16, message: String },

    #[error("Identity provider not configured")]
    NotConfigured,
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),

    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    /// Status code, short label and optional details for this error.
    ///
    /// Expected user-facing outcomes (duplicate vote, quota) are logged below
    /// `error` level; only faults of the service itself are.
    fn parts(&self) -> (StatusCode, &'static str, Option<String>) {
        match self {
            AppError::Domain(DomainError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "Not found", Some(msg.clone()))
            }
            AppError::Domain(DomainError::AlreadyExists(msg)) => {
                tracing::debug!(details = %msg, "Duplicate submission rejected");
                (
                    StatusCode::CONFLICT,
                    "Already exists",
                    Some(ALREADY_RANKED_MESSAGE.to_string()),
                )
            }
            AppError::Domain(DomainError::Validation(msg)) => (
                StatusCode::BAD_REQUEST,
                "Validation error",
                Some(msg.clone()),
            ),
            AppError::Domain(DomainError::QuotaExceeded(msg)) => {
                tracing::debug!(details = %msg, "Daily quota exhausted");
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    "Quota exceeded",
                    Some(msg.clone()),
                )
            }
            AppError::Domain(DomainError::Unauthorized(msg)) => {
                (StatusCode::UNAUTHORIZED, "Unauthorized", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Forbidden(msg)) => {
                (StatusCode::FORBIDDEN, "Forbidden", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Unavailable(msg)) => {
                tracing::warn!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service unavailable",
                    Some(msg.clone()),
                )
            }
            AppError::Domain(DomainError::Database(msg)) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Domain(DomainError::Internal(msg)) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Roster(e) => {
                tracing::warn!("Roster error: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Failed to fetch roster data",
                    None,
                )
            }
            AppError::Identity(e) => match e {
                IdentityError::InvalidToken | IdentityError::MissingEmail => {
                    (StatusCode::UNAUTHORIZED, "Unauthorized", Some(e.to_string()))
                }
                IdentityError::NotConfigured => {
                    tracing::error!("Identity provider not configured");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Service unavailable",
                        None,
                    )
                }
                _ => {
                    tracing::warn!("Identity provider error: {}", e);
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Identity provider unavailable",
                        None,
                    )
                }
            },
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone()))
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized", None),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "Forbidden", Some(msg.clone())),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = self.parts();

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

impl From<RosterError> for DomainError {
    fn from(e: RosterError) -> Self {
        DomainError::Unavailable(format!("Failed to fetch roster data: {}", e))
    }
}
