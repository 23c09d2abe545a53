//! Admin API error types with HTTP status mapping.
//!
//! Every failure leaves the surface as
//! `{"error": <kind>, "message": <text>, "details": [..]}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hm_01_channel_registry::{RegistryError, ValidationError};
use hm_02_channel_lifecycle::LifecycleError;
use hm_03_channel_routing::RoutingError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by admin handlers
#[derive(Debug, Error)]
pub enum AdminApiError {
    /// No bearer token, or a token nobody owns
    #[error("Authentication required")]
    Unauthenticated,

    /// Authenticated, but not allowed to do this
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// Request body is not a channel document
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    Validation(ValidationError),

    #[error("{0}")]
    Conflict(String),

    /// Stored configuration is unusable at dispatch time
    #[error("{0}")]
    FatalConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdminApiError {
    pub fn forbidden(what: impl Into<String>) -> Self {
        Self::Forbidden(what.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidBody(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::FatalConfig(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "Unauthenticated",
            Self::Forbidden(_) => "Forbidden",
            Self::NotFound(_) => "NotFound",
            Self::InvalidBody(_) => "InvalidBody",
            Self::Validation(_) => "ValidationError",
            Self::Conflict(_) => "Conflict",
            Self::FatalConfig(_) => "FatalConfig",
            Self::Internal(_) => "Internal",
        }
    }

    fn details(&self) -> Vec<serde_json::Value> {
        match self {
            Self::Validation(err) => err
                .issues
                .iter()
                .filter_map(|issue| serde_json::to_value(issue).ok())
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    details: Vec<serde_json::Value>,
}

impl IntoResponse for AdminApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(kind = self.kind(), error = %self, "Admin request failed");
        }
        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
            details: self.details(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<RegistryError> for AdminApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Validation(v) => Self::Validation(v),
            RegistryError::Conflict { .. } => Self::Conflict(err.to_string()),
            RegistryError::NotFound(_) => Self::NotFound(err.to_string()),
            RegistryError::Store(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<LifecycleError> for AdminApiError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::Registry(e) => e.into(),
            LifecycleError::InvalidConfig(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<RoutingError> for AdminApiError {
    fn from(err: RoutingError) -> Self {
        match err {
            RoutingError::NotFound { .. } => Self::NotFound(err.to_string()),
            RoutingError::Unauthorized | RoutingError::Forbidden => {
                Self::forbidden(err.to_string())
            }
            RoutingError::FatalConfig { .. } => Self::FatalConfig(err.to_string()),
            RoutingError::Registry(e) => e.into(),
        }
    }
}

impl From<serde_json::Error> for AdminApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidBody(err.to_string())
    }
}

/// Result type for admin handlers
pub type ApiResult<T> = Result<T, AdminApiError>;
