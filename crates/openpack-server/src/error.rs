//! Error-to-response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use openpack_core::CoreError;
use serde_json::json;
use tracing::error;

/// Request-level error taxonomy.
///
/// `NotFound` carries a structured reason for the client. Everything else
/// collapses to an opaque 500: the detail is logged server-side, never
/// leaked into the response body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {reason}")]
    NotFound { reason: &'static str },

    #[error(transparent)]
    Internal(#[from] CoreError),
}

impl ApiError {
    pub fn not_found(reason: &'static str) -> Self {
        Self::NotFound { reason }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound { reason } => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "not_found", "reason": reason })),
            )
                .into_response(),
            Self::Internal(e) => {
                error!(error = %e, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}
