// SPDX-License-Identifier: MIT

//! Poster routes: the form page and the generation endpoint.

use crate::error::{AppError, Result};
use crate::models::PosterRequest;
use crate::AppState;
use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use validator::Validate;

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/api/poster", post(create_poster))
}

/// Serve the form page.
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Generate a poster and return it as a PNG download.
///
/// All pipeline failures surface here as one JSON error notice; nothing is
/// retried, the user simply resubmits.
async fn create_poster(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PosterRequest>,
) -> Result<Response> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    tracing::info!(address = %request.address, "Poster generation requested");

    let png = state.poster_service.generate(request).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"poster.png\"",
            ),
        ],
        png,
    )
        .into_response())
}
