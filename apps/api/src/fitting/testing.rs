//! Deterministic oracles for unit tests.

use crate::fitting::error::FitError;
use crate::fitting::oracle::{FontBlob, ShapedBlock, ShapingOracle};

/// Monospace stand-in for a real font: every char is `char_width` em wide and
/// every line has an ascent of `ascent` em. Font data is ignored.
///
/// The defaults are exact binary fractions so width comparisons in tests
/// never hit rounding noise.
#[derive(Debug, Clone, Copy)]
pub struct FixedWidthOracle {
    pub char_width: f32,
    pub ascent: f32,
}

impl Default for FixedWidthOracle {
    fn default() -> Self {
        Self {
            char_width: 0.5,
            ascent: 0.75,
        }
    }
}

impl FixedWidthOracle {
    pub fn width(&self, text: &str, font_size: f32) -> f32 {
        self.char_width * font_size * text.chars().count() as f32
    }
}

impl ShapingOracle for FixedWidthOracle {
    fn shape(&self, text: &str, _font: &FontBlob, font_size: f32) -> Result<ShapedBlock, FitError> {
        let lines: Vec<&str> = text.split('\n').collect();
        let longest_line_width = lines
            .iter()
            .map(|line| self.width(line, font_size))
            .fold(0.0_f32, f32::max);

        Ok(ShapedBlock {
            per_line_ascent: vec![self.ascent * font_size; lines.len()],
            longest_line_width,
        })
    }
}

/// Always fails the way a malformed font does.
pub struct BrokenFontOracle;

impl ShapingOracle for BrokenFontOracle {
    fn shape(&self, _: &str, _: &FontBlob, _: f32) -> Result<ShapedBlock, FitError> {
        Err(FitError::InvalidOracleState("malformed font data".to_string()))
    }
}

pub fn test_font() -> FontBlob {
    FontBlob::new(b"not-a-real-font".to_vec())
}
