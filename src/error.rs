//! Error types for the dashboard API
//!
//! Errors are classified by how the client sees them:
//! - Configuration: Airtable credentials missing, detected before any network call
//! - NotFound: a lookup matched zero records
//! - BadRequest: a required request parameter is absent, or the path/query is malformed
//! - Upstream: Airtable or a webhook failed; the cause is passed through as `details`

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Message returned when the Airtable credentials are not configured.
pub const CONFIGURATION_MISSING: &str = "Airtable configuration missing. Please set AIRTABLE_API_KEY and AIRTABLE_BASE_ID environment variables.";

/// Endpoint-boundary error. Every handler converts failures into one of these.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", CONFIGURATION_MISSING)]
    Configuration,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    /// `context` names the failed operation, `details` carries the upstream cause.
    #[error("{context}")]
    Upstream { context: String, details: String },
}

impl ApiError {
    pub fn upstream(context: &str, err: impl std::fmt::Display) -> Self {
        ApiError::Upstream {
            context: context.to_string(),
            details: err.to_string(),
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn details(&self) -> Option<&str> {
        match self {
            ApiError::Upstream { details, .. } => Some(details),
            _ => None,
        }
    }
}

/// Serializable error representation returned to clients.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&ApiError> for ErrorBody {
    fn from(err: &ApiError) -> Self {
        ErrorBody {
            error: err.to_string(),
            details: err.details().map(str::to_string),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorBody::from(&self))).into_response()
    }
}
