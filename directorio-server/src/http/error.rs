//! API error types with IntoResponse
//!
//! Errors are converted to `{"error": ..., "details": ...}` bodies. The
//! status for a missing record depends on the operation: lookups and
//! deletes answer 404 with their own message, updates answer 400.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::models::ValidationError;
use crate::service::ServiceError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Path id is not an unsigned integer (400)
    InvalidId,

    /// Body is malformed or fails validation (400)
    InvalidBody { details: String },

    /// Domain rule rejected the request (400)
    BadRequest { error: &'static str, details: String },

    /// Resource not found (404)
    NotFound { error: &'static str, details: String },

    /// Request conflicts with current state (409)
    Conflict { error: &'static str, details: String },

    /// Storage or other internal failure (500, logged)
    Internal { error: &'static str, source: String },
}

/// How an operation reports a record that does not exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    /// 404 with this `error` message
    NotFound(&'static str),
    /// 400 with the operation's `error` message
    BadRequest,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

impl ApiError {
    /// Map a service error for an operation whose failures are described
    /// by `error`.
    pub fn service(error: &'static str, e: ServiceError, missing: Missing) -> Self {
        let details = e.to_string();
        match (e, missing) {
            (ServiceError::Db(db), _) => Self::Internal {
                error,
                source: db.to_string(),
            },
            (ServiceError::AreaInUse(_), _) => Self::Conflict { error, details },
            (e, Missing::NotFound(not_found)) if e.is_not_found() => Self::NotFound {
                error: not_found,
                details,
            },
            _ => Self::BadRequest { error, details },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidId | Self::InvalidBody { .. } | Self::BadRequest { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::InvalidId => ErrorBody {
                error: "ID inválido",
                details: None,
            },
            Self::InvalidBody { details } => ErrorBody {
                error: "Datos inválidos",
                details: Some(details.as_str()),
            },
            Self::BadRequest { error, details }
            | Self::NotFound { error, details }
            | Self::Conflict { error, details } => ErrorBody {
                error: *error,
                details: Some(details.as_str()),
            },
            Self::Internal { error, source } => {
                // Log the actual error, return generic message
                tracing::error!(error = %error, source = %source, "Storage error");
                ErrorBody {
                    error: *error,
                    details: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::InvalidBody {
            details: e.to_string(),
        }
    }
}
