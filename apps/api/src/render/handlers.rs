//! Axum route handlers for the render API.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::fitting::{fit, longest_line_width, total_lines_height, FitError, FitResult};
use crate::options::RenderOptions;
use crate::render::{fit_request, text_to_image};
use crate::state::AppState;

const CACHE_CONTROL: &str = "max-age=31536000, immutable";

/// A fit plus the block measurements a renderer needs to centre it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitResponse {
    #[serde(flatten)]
    pub fit: FitResult,
    pub block_height: f32,
    pub longest_line_width: f32,
}

/// GET /<anything>?text=...&w=...
///
/// Renders the query's text onto a PNG. Any path is accepted; paths mentioning
/// `favicon` get an empty 404.
pub async fn handle_render(
    State(state): State<AppState>,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppError> {
    info!(%uri, "Render request");
    if uri.to_string().contains("favicon") {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let options = RenderOptions::from_query(&params)?;

    let background = match options.background_url.as_deref() {
        Some(url) => Some(state.background.fetch(url).await?),
        None => None,
    };

    // Fitting + painting are CPU-bound; keep them off the async executor.
    let oracle = state.oracle.clone();
    let font = state.font.clone();
    let png = tokio::task::spawn_blocking(move || {
        text_to_image(oracle.as_ref(), &font, &options, background.as_deref())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))??;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, CACHE_CONTROL),
        ],
        png,
    )
        .into_response())
}

/// GET /api/v1/fit?text=...&w=...
///
/// Runs only the fitting engine and returns the chosen size, the lines and the
/// block's measurements as JSON. Accepts the same query parameters as the image route.
pub async fn handle_fit(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<FitResponse>, AppError> {
    let options = RenderOptions::from_query(&params)?;
    let request = fit_request(&options, &state.font);

    let oracle = state.oracle.clone();
    let response = tokio::task::spawn_blocking(move || -> Result<FitResponse, FitError> {
        let oracle = oracle.as_ref();
        let fit = fit(oracle, &request)?;
        let block_height = total_lines_height(oracle, &fit.lines, &request.font, fit.font_size)?;
        let longest_line_width =
            longest_line_width(oracle, &fit.lines, &request.font, fit.font_size)?;
        Ok(FitResponse {
            fit,
            block_height,
            longest_line_width,
        })
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in fit: {e}")))??;

    Ok(Json(response))
}
