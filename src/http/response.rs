//! Response shaping and application errors.
//!
//! # Design Decisions
//! - Client-facing bodies are fixed and generic; detail only goes to the
//!   server logs (no leakage through error responses)
//! - Validation failures are the one exception: the full error list is
//!   returned so the form can surface everything at once

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::contact::SupabaseError;

/// Fixed body returned for any submission-path failure.
const SUBMIT_FAILED: &str = "Error submitting form. Please try again.";

/// Application-level request handling error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(Vec<String>),

    #[error("persistence backend not configured")]
    NotConfigured,

    #[error("persistence failed: {0}")]
    Persistence(#[from] SupabaseError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "errors": errors }))).into_response()
            }
            AppError::NotConfigured => {
                tracing::warn!("Contact submission rejected: persistence not configured");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "error": SUBMIT_FAILED })),
                )
                    .into_response()
            }
            AppError::Persistence(error) => {
                tracing::error!(%error, "Contact submission failed");
                (StatusCode::BAD_GATEWAY, Json(json!({ "error": SUBMIT_FAILED }))).into_response()
            }
            AppError::Internal(detail) => {
                tracing::error!(detail = %detail, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal Server Error" })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_error_classes() {
        assert_eq!(
            AppError::Validation(vec!["x".into()]).into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::NotConfigured.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Persistence(SupabaseError::Rejected { status: 500 })
                .into_response()
                .status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Internal("boom".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
