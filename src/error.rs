// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::{flow::validator::FlowError, store::StoreError};

/// Status used for every user-facing "nothing there / not allowed" outcome.
/// Kept at 402 for compatibility with existing clients.
pub const REJECTED: StatusCode = StatusCode::PAYMENT_REQUIRED;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error, details are returned to the caller
    InternalServerError(String),

    // 402, requested data does not exist ("No questionnaire found.")
    NoContent(String),

    // 402, answer submission refused by the flow rules
    Rejected(String),

    // Admin endpoints answer with {"status": "failed", "reason": ...}
    AdminFailed(StatusCode, String),

    // 404 for unknown routes
    EndpointNotFound,
}

impl AppError {
    pub fn admin(status: StatusCode, reason: impl fmt::Display) -> Self {
        AppError::AdminFailed(status, reason.to_string())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": msg })),
                )
                    .into_response()
            }
            AppError::NoContent(msg) | AppError::Rejected(msg) => {
                (REJECTED, Json(json!({ "message": msg }))).into_response()
            }
            AppError::AdminFailed(status, reason) => {
                if status.is_server_error() {
                    tracing::error!("Admin operation failed: {}", reason);
                }
                (status, Json(json!({ "status": "failed", "reason": reason }))).into_response()
            }
            AppError::EndpointNotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": "Endpoint not found." })),
            )
                .into_response(),
        }
    }
}

/// Allows using `?` on store calls in handlers.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<FlowError> for AppError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::Rejected(reason) => AppError::Rejected(reason.message().to_string()),
            FlowError::Storage(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::validator::RejectionReason;

    #[test]
    fn flow_rejections_map_to_402_messages() {
        let err = AppError::from(FlowError::Rejected(RejectionReason::Unreachable));
        assert!(matches!(&err, AppError::Rejected(m) if m == "Cannot answer that question."));
        assert_eq!(err.into_response().status(), REJECTED);
    }

    #[test]
    fn storage_failures_are_internal_errors() {
        let err = AppError::from(FlowError::Storage(StoreError::Unavailable("down".into())));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
