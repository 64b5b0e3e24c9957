use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

/// Errors returned by the API routes.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum ApiError {
    #[display("Missing or unknown bearer token")]
    Unauthorized,

    #[display("The token does not grant the '{scope}' scope")]
    Forbidden { scope: &'static str },

    #[display("{message}")]
    BadRequest { message: String },

    #[display("{message}")]
    NotFound { message: String },

    #[display("{message}")]
    Conflict { message: String },

    #[display("{message}")]
    FailedDependency { message: String },
}

impl ApiError {
    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub(crate) fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::FailedDependency { .. } => StatusCode::FAILED_DEPENDENCY,
        }
    }

    /// Status name carried by the error body, e.g. `FailedDependency`.
    pub(crate) fn status_name(&self) -> &'static str {
        match self {
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden { .. } => "Forbidden",
            Self::BadRequest { .. } => "BadRequest",
            Self::NotFound { .. } => "NotFound",
            Self::Conflict { .. } => "Conflict",
            Self::FailedDependency { .. } => "FailedDependency",
        }
    }
}

/// API error response returned for all error cases
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Status name, e.g. `Conflict`
    pub status: String,
    /// Human-readable error message
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let error_response = ApiErrorResponse {
            status: self.status_name().to_string(),
            message: self.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}
