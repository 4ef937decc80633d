// SPDX-License-Identifier: MIT

//! Application error types with consistent API responses.

use crate::services::geocoding::GeocodeError;
use crate::services::map::MapError;
use crate::services::poster::ComposeError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
///
/// Each pipeline stage keeps its own error enum; this type is the single
/// boundary where a failed submission becomes a user-facing notice.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Geocoding failed: {0}")]
    Geocode(#[from] GeocodeError),

    #[error("Map rendering failed: {0}")]
    Map(#[from] MapError),

    #[error("Poster composition failed: {0}")]
    Compose(#[from] ComposeError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Geocode(GeocodeError::NoMatch { query }) => (
                StatusCode::NOT_FOUND,
                "address_not_found",
                Some(format!("No location found for \"{}\"", query)),
            ),
            AppError::Geocode(err) => {
                (StatusCode::BAD_GATEWAY, "geocoding_error", Some(err.to_string()))
            }
            AppError::Map(err) => (StatusCode::BAD_GATEWAY, "map_error", Some(err.to_string())),
            AppError::Compose(err) => {
                tracing::error!(error = %err, "Poster composition error");
                (StatusCode::INTERNAL_SERVER_ERROR, "render_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
