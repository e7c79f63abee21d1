//! Error handling middleware - RFC 7807 compliant responses.

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use inkpost_core::DomainError;
use inkpost_core::ports::GenerationError;
use inkpost_core::services::AssistantError;
use inkpost_shared::ErrorResponse;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    Conflict(String),
    TooManyRequests(String),
    /// An outbound dependency answered badly.
    BadGateway(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::TooManyRequests(msg) => write!(f, "Too many requests: {}", msg),
            AppError::BadGateway(msg) => write!(f, "Bad gateway: {}", msg),
            AppError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let title = status.canonical_reason().unwrap_or("Error");
        let error = match self {
            AppError::Unauthorized => ErrorResponse::new(status.as_u16(), title),
            AppError::Internal(detail) => {
                tracing::error!(detail = %detail, "Internal error");
                ErrorResponse::new(status.as_u16(), title)
            }
            AppError::NotFound(detail)
            | AppError::BadRequest(detail)
            | AppError::Conflict(detail)
            | AppError::TooManyRequests(detail)
            | AppError::BadGateway(detail)
            | AppError::ServiceUnavailable(detail) => {
                ErrorResponse::new(status.as_u16(), title).with_detail(detail.clone())
            }
        };

        HttpResponse::build(status).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(what) => AppError::NotFound(format!("{} not found", what)),
            // Same body for both cases so callers cannot tell which one applies.
            DomainError::NotFoundOrUnauthorized => {
                AppError::NotFound("Resource not found".to_string())
            }
            DomainError::Unauthorized => AppError::Unauthorized,
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Upstream(msg) => {
                tracing::error!(error = %msg, "Store unavailable");
                AppError::Internal("Storage unavailable".to_string())
            }
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<AssistantError> for AppError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::Validation(msg) => AppError::BadRequest(msg),
            AssistantError::Generation(e) => {
                let detail = e.to_string();
                match e {
                    GenerationError::NotConfigured => AppError::ServiceUnavailable(detail),
                    GenerationError::QuotaExceeded => AppError::TooManyRequests(detail),
                    GenerationError::Api(_) => {
                        tracing::warn!(error = %detail, "Text generation failed");
                        AppError::BadGateway("AI provider request failed".to_string())
                    }
                    GenerationError::InvalidResponse => {
                        tracing::warn!(error = %detail, "Text generation failed");
                        AppError::BadGateway(detail)
                    }
                }
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
