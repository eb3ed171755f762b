// ABOUTME: API error type and its HTTP mapping
// ABOUTME: Turns storage and validation failures into structured JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use toolkit_storage::StorageError;

/// Error type returned by every handler
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("User-Id required in request headers.")]
    Unauthorized,

    #[error("{resource} with ID: {id} not found.")]
    NotFound { resource: &'static str, id: String },

    #[error("Tool name {0} already exists for given agent.")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(StorageError),
}

/// Structured error response format for API consistency
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorDetail,
    request_id: String,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { resource, id } => Self::NotFound { resource, id },
            StorageError::Conflict(tool_name) => Self::Conflict(tool_name),
            other => Self::Storage(other),
        }
    }
}

impl ApiError {
    pub fn validation(errors: Vec<String>) -> Self {
        Self::Validation(errors)
    }

    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// HTTP status code and machine-readable error code
    fn to_status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            // Missing resources are reported as a bad request, not 404
            ApiError::NotFound { .. } => (StatusCode::BAD_REQUEST, "NOT_FOUND"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
        }
    }

    fn to_user_message(&self) -> String {
        match self {
            ApiError::Validation(errors) => {
                format!("Validation failed: {} error(s)", errors.len())
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let (status_code, error_code) = self.to_status_and_code();

        if status_code.is_server_error() {
            error!(
                request_id = %request_id,
                error_code = %error_code,
                error = %self,
                "Storage system error"
            );
        } else {
            info!(
                request_id = %request_id,
                error_code = %error_code,
                error = %self,
                "API error response"
            );
        }

        let details = match &self {
            ApiError::Validation(errors) => Some(errors.clone()),
            _ => None,
        };

        let error_response = ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: error_code.to_string(),
                message: self.to_user_message(),
                details,
            },
            request_id,
        };

        (status_code, Json(error_response)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
