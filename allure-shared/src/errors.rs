use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{service}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E2xxx: Discovery errors
/// - E3xxx: Matching errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    Unauthorized,
    ServiceUnavailable,
    BadRequest,
    TokenExpired,
    TokenInvalid,

    // Discovery (E2xxx)
    EscortNotFound,

    // Matching (E3xxx)
    InvalidSwipeAction,
    SwipeRateLimited,
    MemberRoleRequired,
    InvalidPreferences,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::Unauthorized => "E0004",
            Self::ServiceUnavailable => "E0007",
            Self::BadRequest => "E0008",
            Self::TokenExpired => "E0010",
            Self::TokenInvalid => "E0011",

            // Discovery
            Self::EscortNotFound => "E2001",

            // Matching
            Self::InvalidSwipeAction => "E3001",
            Self::SwipeRateLimited => "E3002",
            Self::MemberRoleRequired => "E3003",
            Self::InvalidPreferences => "E3004",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError | Self::ServiceUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationError | Self::BadRequest | Self::InvalidSwipeAction
            | Self::InvalidPreferences => StatusCode::BAD_REQUEST,
            Self::EscortNotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized | Self::TokenExpired | Self::TokenInvalid => StatusCode::UNAUTHORIZED,
            Self::MemberRoleRequired => StatusCode::FORBIDDEN,
            Self::SwipeRateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Status the error will be rendered with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Known { code, .. } => code.status_code(),
            AppError::Internal(_) | AppError::Database(_) | AppError::Pool(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = match &self {
            AppError::Known { code, message, details } => {
                let mut resp = ApiErrorResponse::new(code.code(), message);
                if let Some(d) = details {
                    resp = resp.with_details(d.clone());
                }
                resp
            }
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                ApiErrorResponse::new(ErrorCode::InternalError.code(), "internal server error")
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                ApiErrorResponse::new(ErrorCode::InternalError.code(), "database error")
            }
            AppError::Pool(err) => {
                tracing::error!(error = %err, "database pool exhausted or unreachable");
                ApiErrorResponse::new(ErrorCode::ServiceUnavailable.code(), "service unavailable")
            }
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
