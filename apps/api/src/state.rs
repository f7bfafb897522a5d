use std::sync::Arc;

use crate::background::BackgroundSource;
use crate::fitting::{FontBlob, ShapingOracle};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Default font, loaded once at startup and handed to every fit and render.
    pub font: FontBlob,
    /// Measurement backend for the fitting engine. Default: `FaceOracle`.
    pub oracle: Arc<dyn ShapingOracle>,
    pub background: Arc<dyn BackgroundSource>,
}
