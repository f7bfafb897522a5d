mod background;
mod config;
mod errors;
mod fitting;
mod options;
mod render;
mod routes;
mod shaping;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::background::HttpBackgroundSource;
use crate::config::Config;
use crate::routes::build_router;
use crate::shaping::{load_font_file, FaceOracle};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (aborts on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting textcard v{}", env!("CARGO_PKG_VERSION"));

    // Default font: loaded once, shared read-only by every request
    let font = load_font_file(&config.default_font_path)?;

    let background = HttpBackgroundSource::new(
        Duration::from_secs(config.background_timeout_secs),
        config.background_max_bytes,
    )?;
    info!(
        timeout_secs = config.background_timeout_secs,
        max_bytes = config.background_max_bytes,
        "Background fetcher initialized"
    );

    let state = AppState {
        font,
        oracle: Arc::new(FaceOracle),
        background: Arc::new(background),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
