//! The shaping seam between the fitting engine and a text-layout backend.
//!
//! The engine never looks at glyphs. It asks a [`ShapingOracle`] to lay out a
//! (possibly multi-line) block and consumes two aggregates: the ascent of every
//! laid-out line and the width of the longest one.

use std::fmt;
use std::sync::Arc;

use crate::fitting::error::FitError;

/// Subtracted from a single line's ascent to get its standalone line height.
pub const LINE_HEIGHT_BIAS: f32 = 5.0;

// ────────────────────────────────────────────────────────────────────────────
// Font data
// ────────────────────────────────────────────────────────────────────────────

/// Immutable font file contents, shared read-only by every measurement call.
///
/// Cloning is cheap (reference counted), so a blob can be moved into
/// `spawn_blocking` closures without copying the font.
#[derive(Clone, PartialEq, Eq)]
pub struct FontBlob(Arc<[u8]>);

impl FontBlob {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for FontBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontBlob")
            .field("len", &self.0.len())
            .finish()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Oracle contract
// ────────────────────────────────────────────────────────────────────────────

/// Metrics for one shaped block of text.
///
/// `per_line_ascent` has one entry per laid-out line, in order. It is never
/// empty: an empty string still lays out as one (empty) line.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedBlock {
    pub per_line_ascent: Vec<f32>,
    pub longest_line_width: f32,
}

/// Standalone measurement of a single line, with the height bias applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    pub ascent_height: f32,
    pub longest_line_width: f32,
}

/// A text-layout backend.
///
/// Implementations must be deterministic for identical inputs and must accept
/// blocks whose lines are separated by a single `\n`. Any per-call resources
/// (parsed faces, paragraph objects) belong to the call and are released before
/// it returns.
pub trait ShapingOracle: Send + Sync {
    fn shape(&self, text: &str, font: &FontBlob, font_size: f32) -> Result<ShapedBlock, FitError>;
}

/// Measures `text` as one line: the first line's ascent less [`LINE_HEIGHT_BIAS`],
/// and the block's longest-line width.
pub fn measure_line<O: ShapingOracle + ?Sized>(
    oracle: &O,
    text: &str,
    font: &FontBlob,
    font_size: f32,
) -> Result<LineMetrics, FitError> {
    let block = oracle.shape(text, font, font_size)?;
    let ascent = block.per_line_ascent.first().copied().ok_or_else(|| {
        FitError::InvalidOracleState("oracle returned a block with no lines".to_string())
    })?;

    Ok(LineMetrics {
        ascent_height: ascent - LINE_HEIGHT_BIAS,
        longest_line_width: block.longest_line_width,
    })
}
