//! Font-Size Solver: finds the largest font size at which the text fits a box.
//!
//! # Search
//! Start at the requested size and step down by [`FONT_SIZE_STEP`] until the
//! fit predicate holds: the text is broken at the candidate size, then the
//! resulting block must be no taller than `max_height` and no wider than
//! `max_width`.
//!
//! The walk stops at zero. If no positive candidate fits, the request fails with
//! [`FitError::SizeUnsatisfiable`] instead of stepping into negative sizes. It
//! also stops when a step no longer lowers the size, which happens for starting
//! sizes so large that `f32` cannot represent `size - 5`.

use serde::Serialize;
use tracing::{debug, warn};

use crate::fitting::error::FitError;
use crate::fitting::line_breaker::break_text;
use crate::fitting::oracle::{FontBlob, ShapingOracle};
use crate::fitting::summarizer::summarize;

pub const FONT_SIZE_STEP: f32 = 5.0;

// ────────────────────────────────────────────────────────────────────────────
// Request / result types
// ────────────────────────────────────────────────────────────────────────────

/// One fitting job. `max_height` and `max_width` are the box already reduced by
/// any padding.
#[derive(Debug, Clone)]
pub struct FitRequest {
    pub text: String,
    pub font: FontBlob,
    pub initial_font_size: f32,
    pub max_height: f32,
    pub max_width: f32,
    pub no_wrap: bool,
}

/// The chosen size and the lines to paint at that size, in paint order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitResult {
    pub font_size: f32,
    pub lines: Vec<String>,
}

impl FitRequest {
    /// Rejects inputs that would make the search loop meaningless.
    pub fn validate(&self) -> Result<(), FitError> {
        validate_inputs(
            &self.text,
            self.initial_font_size,
            self.max_height,
            self.max_width,
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry points
// ────────────────────────────────────────────────────────────────────────────

/// Fits `request.text` into the request's box.
pub fn fit<O: ShapingOracle + ?Sized>(
    oracle: &O,
    request: &FitRequest,
) -> Result<FitResult, FitError> {
    request.validate()?;
    search(
        oracle,
        &request.text,
        &request.font,
        request.initial_font_size,
        request.max_height,
        request.max_width,
        request.no_wrap,
    )
}

/// Returns only the chosen font size, for renderers that break the text
/// themselves at that size. The bundled renderer uses [`fit`] instead.
#[allow(dead_code)]
pub fn solve_font_size<O: ShapingOracle + ?Sized>(
    oracle: &O,
    text: &str,
    font: &FontBlob,
    initial_font_size: f32,
    max_height: f32,
    max_width: f32,
    no_wrap: bool,
) -> Result<f32, FitError> {
    validate_inputs(text, initial_font_size, max_height, max_width)?;
    search(
        oracle,
        text,
        font,
        initial_font_size,
        max_height,
        max_width,
        no_wrap,
    )
    .map(|result| result.font_size)
}

// ────────────────────────────────────────────────────────────────────────────
// Search loop
// ────────────────────────────────────────────────────────────────────────────

fn search<O: ShapingOracle + ?Sized>(
    oracle: &O,
    text: &str,
    font: &FontBlob,
    initial_font_size: f32,
    max_height: f32,
    max_width: f32,
    no_wrap: bool,
) -> Result<FitResult, FitError> {
    let mut font_size = initial_font_size;

    loop {
        let lines = break_text(oracle, text, font, font_size, max_width, no_wrap)?;
        let summary = summarize(oracle, &lines, font, font_size)?;

        if summary.total_height <= max_height && summary.longest_line_width <= max_width {
            debug!(font_size, lines = lines.len(), "Font size fits");
            return Ok(FitResult { font_size, lines });
        }

        debug!(
            font_size,
            height = summary.total_height,
            width = summary.longest_line_width,
            "Font size too large, stepping down"
        );

        let next = font_size - FONT_SIZE_STEP;
        if next <= 0.0 || next >= font_size {
            warn!(
                last_tried = font_size,
                max_height, max_width, "No positive font size fits the box"
            );
            return Err(FitError::SizeUnsatisfiable {
                last_tried: font_size,
            });
        }
        font_size = next;
    }
}

fn validate_inputs(
    text: &str,
    initial_font_size: f32,
    max_height: f32,
    max_width: f32,
) -> Result<(), FitError> {
    if text.is_empty() {
        return Err(FitError::DegenerateInput("text cannot be empty".to_string()));
    }
    for (name, value) in [
        ("initial font size", initial_font_size),
        ("box height", max_height),
        ("box width", max_width),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(FitError::DegenerateInput(format!(
                "{name} must be positive, got {value}"
            )));
        }
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
