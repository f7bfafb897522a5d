pub mod health;

use axum::{routing::get, Router};

use crate::render::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/fit", get(handlers::handle_fit))
        // Every other path renders an image, like the root does.
        .fallback(handlers::handle_render)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use bytes::Bytes;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::background::{BackgroundError, BackgroundSource, HttpBackgroundSource};
    use crate::fitting::testing::{test_font, FixedWidthOracle};
    use crate::fitting::{FontBlob, ShapingOracle};
    use crate::shaping::FaceOracle;

    /// Serves the same bytes for every URL.
    struct StaticBackground(&'static [u8]);

    #[async_trait]
    impl BackgroundSource for StaticBackground {
        async fn fetch(&self, _url: &str) -> Result<Bytes, BackgroundError> {
            Ok(Bytes::from_static(self.0))
        }
    }

    fn make_state(oracle: Arc<dyn ShapingOracle>, background: Arc<dyn BackgroundSource>) -> AppState {
        AppState {
            font: test_font(),
            oracle,
            background,
        }
    }

    fn fake_router() -> Router {
        build_router(make_state(
            Arc::new(FixedWidthOracle::default()),
            Arc::new(StaticBackground(b"")),
        ))
    }

    async fn send_get(router: Router, uri: &str) -> (StatusCode, Bytes) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body)
    }

    fn error_code(body: &Bytes) -> String {
        let json: Value = serde_json::from_slice(body).unwrap();
        json["error"]["code"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send_get(fake_router(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_favicon_is_not_found() {
        let (status, body) = send_get(fake_router(), "/favicon.ico").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_fit_endpoint_returns_size_and_lines() {
        let (status, body) = send_get(
            fake_router(),
            "/api/v1/fit?text=Short&w=1200&h=1200&wpadding=200&hpadding=200&fontsize=50",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["fontSize"], 50.0);
        assert_eq!(json["lines"], serde_json::json!(["Short"]));
        // 0.75 * 50 ascent, 5 chars * 0.5 * 50 wide
        assert_eq!(json["blockHeight"], 37.5);
        assert_eq!(json["longestLineWidth"], 125.0);
    }

    #[tokio::test]
    async fn test_fit_endpoint_wraps_long_caption() {
        let (status, body) = send_get(
            fake_router(),
            "/api/v1/fit?text=Hello%20world%20this%20is%20a%20long%20caption\
             &w=500&h=400&wpadding=200&hpadding=200&fontsize=100",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["fontSize"], 60.0);
        assert_eq!(json["lines"].as_array().map(Vec::len), Some(4));
    }

    #[tokio::test]
    async fn test_unsatisfiable_box_is_422() {
        let (status, body) = send_get(
            fake_router(),
            "/?text=Hello&w=100&h=100&wpadding=99&hpadding=99",
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error_code(&body), "UNPROCESSABLE_ENTITY");
    }

    #[tokio::test]
    async fn test_bad_integer_is_400() {
        let (status, body) = send_get(fake_router(), "/?fontsize=huge").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_huge_font_size_is_400() {
        let (status, body) =
            send_get(fake_router(), "/?text=Hello&fontsize=200000000&w=10&h=10").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_overflowing_padding_is_400() {
        let (status, _) =
            send_get(fake_router(), "/api/v1/fit?wpadding=-9223372036854775808").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_fit_text_is_decoded_twice() {
        let (status, body) = send_get(
            fake_router(),
            "/api/v1/fit?text=100%2525&w=1200&h=1200&fontsize=50",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["lines"], serde_json::json!(["100%"]));
    }

    #[tokio::test]
    async fn test_padding_wider_than_canvas_is_400() {
        let (status, _) = send_get(fake_router(), "/api/v1/fit?w=100&wpadding=300").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_http_background_is_400() {
        let router = build_router(make_state(
            Arc::new(FixedWidthOracle::default()),
            Arc::new(HttpBackgroundSource::new(Duration::from_secs(1), 1024).unwrap()),
        ));
        let (status, _) = send_get(router, "/?background=file:///etc/hosts").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_undecodable_background_is_502() {
        let router = build_router(make_state(
            Arc::new(FixedWidthOracle::default()),
            Arc::new(StaticBackground(b"not an image")),
        ));
        let (status, body) = send_get(router, "/?text=Hi&background=https://example.com/bg.png").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(error_code(&body), "UPSTREAM_ERROR");
    }

    #[tokio::test]
    async fn test_malformed_font_is_500() {
        let mut state = make_state(Arc::new(FaceOracle), Arc::new(StaticBackground(b"")));
        state.font = FontBlob::new(b"garbage".to_vec());
        let (status, body) = send_get(build_router(state), "/?text=Hello").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_code(&body), "FONT_ERROR");
    }
}
