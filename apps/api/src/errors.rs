use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::background::BackgroundError;
use crate::fitting::FitError;
use crate::render::RenderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        match err {
            FitError::DegenerateInput(msg) => AppError::Validation(msg),
            FitError::SizeUnsatisfiable { .. } => AppError::UnprocessableEntity(err.to_string()),
            FitError::InvalidOracleState(msg) => AppError::Font(msg),
        }
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Fit(fit) => fit.into(),
            RenderError::Canvas(msg) => AppError::Validation(msg),
            RenderError::Background(e) => {
                AppError::Upstream(format!("Background image could not be decoded: {e}"))
            }
            other => AppError::Internal(other.into()),
        }
    }
}

impl From<BackgroundError> for AppError {
    fn from(err: BackgroundError) -> Self {
        match err {
            BackgroundError::InvalidUrl(msg) => AppError::Validation(msg),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Font(msg) => {
                tracing::error!("Font error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "FONT_ERROR",
                    "The configured font could not be used".to_string(),
                )
            }
            AppError::Upstream(msg) => {
                tracing::warn!("Upstream error: {msg}");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
