//! Layout Summarizer: block-level measurements of a line sequence.
//!
//! Lines are rejoined with `\n` and shaped once as a single block, so the
//! oracle's own multi-line model decides the numbers. Per-line measurements are
//! never summed independently.

use crate::fitting::error::FitError;
use crate::fitting::oracle::{FontBlob, ShapedBlock, ShapingOracle};

/// Height and width of a shaped line block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockSummary {
    /// Sum of the ascent of every line in the block.
    pub total_height: f32,
    pub longest_line_width: f32,
}

/// Shapes `lines` once and returns both aggregates.
pub fn summarize<O: ShapingOracle + ?Sized>(
    oracle: &O,
    lines: &[String],
    font: &FontBlob,
    font_size: f32,
) -> Result<BlockSummary, FitError> {
    let block = shape_block(oracle, lines, font, font_size)?;
    Ok(BlockSummary {
        total_height: block.per_line_ascent.iter().sum(),
        longest_line_width: block.longest_line_width,
    })
}

pub fn total_lines_height<O: ShapingOracle + ?Sized>(
    oracle: &O,
    lines: &[String],
    font: &FontBlob,
    font_size: f32,
) -> Result<f32, FitError> {
    Ok(summarize(oracle, lines, font, font_size)?.total_height)
}

pub fn longest_line_width<O: ShapingOracle + ?Sized>(
    oracle: &O,
    lines: &[String],
    font: &FontBlob,
    font_size: f32,
) -> Result<f32, FitError> {
    Ok(summarize(oracle, lines, font, font_size)?.longest_line_width)
}

fn shape_block<O: ShapingOracle + ?Sized>(
    oracle: &O,
    lines: &[String],
    font: &FontBlob,
    font_size: f32,
) -> Result<ShapedBlock, FitError> {
    let joined = lines.join("\n");
    oracle.shape(joined.trim(), font, font_size)
}
