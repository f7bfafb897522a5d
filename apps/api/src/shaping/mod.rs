//! Font-backed Shaping Oracle built on `ttf-parser` and `rustybuzz`.
//!
//! Every `shape` call parses the face and lays out a `Paragraph` that lives
//! only for that call. Nothing is cached between calls.

use std::path::Path;

use anyhow::{Context, Result};
use rustybuzz::{Face as HbFace, UnicodeBuffer};
use tracing::info;

use crate::fitting::{FitError, FontBlob, ShapedBlock, ShapingOracle};

/// Shapes text with the font passed to each call.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaceOracle;

impl ShapingOracle for FaceOracle {
    fn shape(&self, text: &str, font: &FontBlob, font_size: f32) -> Result<ShapedBlock, FitError> {
        let paragraph = Paragraph::layout(font, text, font_size)?;
        Ok(paragraph.block())
    }
}

/// One positioned glyph, in canvas pixels with y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    pub glyph_id: u16,
    pub origin_x: f32,
    pub origin_y: f32,
    /// Font units to pixels.
    pub scale: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Paragraph layout
// ────────────────────────────────────────────────────────────────────────────

struct ShapedLine {
    width: f32,
    ascent: f32,
}

/// A laid-out block of `\n`-separated lines. The parsed face is dropped as
/// soon as layout finishes.
struct Paragraph {
    lines: Vec<ShapedLine>,
}

impl Paragraph {
    fn layout(font: &FontBlob, text: &str, font_size: f32) -> Result<Self, FitError> {
        let face = parse_face(font)?;
        let scale = font_size / face.units_per_em().max(1) as f32;
        let ascent = face.ascender() as f32 * scale;

        let lines = text
            .split('\n')
            .map(|line| ShapedLine {
                width: shaped_advances(&face, line).iter().sum::<f32>() * scale,
                ascent,
            })
            .collect();

        Ok(Self { lines })
    }

    fn block(&self) -> ShapedBlock {
        ShapedBlock {
            per_line_ascent: self.lines.iter().map(|l| l.ascent).collect(),
            longest_line_width: self.lines.iter().map(|l| l.width).fold(0.0_f32, f32::max),
        }
    }
}

fn parse_face(font: &FontBlob) -> Result<HbFace<'_>, FitError> {
    HbFace::from_slice(font.as_bytes(), 0).ok_or_else(|| {
        FitError::InvalidOracleState("font data could not be parsed".to_string())
    })
}

/// Horizontal advance of every shaped glyph, in font units.
fn shaped_advances(face: &HbFace<'_>, line: &str) -> Vec<f32> {
    if line.is_empty() {
        return Vec::new();
    }
    let mut buffer = UnicodeBuffer::new();
    buffer.push_str(line);
    let output = rustybuzz::shape(face, &[], buffer);
    output
        .glyph_positions()
        .iter()
        .map(|pos| pos.x_advance as f32)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Glyph placement for painting
// ────────────────────────────────────────────────────────────────────────────

/// Shapes one line and positions its glyphs from a left origin on a baseline.
///
/// Glyphs without an id (`.notdef`) still advance the pen but are not returned.
pub fn layout_glyphs(
    font: &FontBlob,
    text: &str,
    font_size: f32,
    origin_x: f32,
    baseline_y: f32,
) -> Result<Vec<GlyphPlacement>, FitError> {
    let face = parse_face(font)?;
    let units = face.units_per_em().max(1) as f32;
    let scale = font_size / units;

    let mut buffer = UnicodeBuffer::new();
    buffer.push_str(text);
    let output = rustybuzz::shape(&face, &[], buffer);

    let mut out = Vec::with_capacity(output.len());
    let mut pen_x = 0.0_f32;
    let mut pen_y = 0.0_f32;
    for (info, pos) in output.glyph_infos().iter().zip(output.glyph_positions()) {
        let gid = info.glyph_id as u16;
        if gid != 0 {
            out.push(GlyphPlacement {
                glyph_id: gid,
                origin_x: origin_x + pen_x + pos.x_offset as f32 * scale,
                origin_y: baseline_y - (pen_y + pos.y_offset as f32 * scale),
                scale,
            });
        }
        pen_x += pos.x_advance as f32 * scale;
        pen_y += pos.y_advance as f32 * scale;
    }
    Ok(out)
}

// ────────────────────────────────────────────────────────────────────────────
// Loading
// ────────────────────────────────────────────────────────────────────────────

/// Reads a font file and checks that it parses before handing it out.
pub fn load_font_file(path: impl AsRef<Path>) -> Result<FontBlob> {
    let path = path.as_ref();
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read font file '{}'", path.display()))?;

    let face = ttf_parser::Face::parse(&data, 0)
        .with_context(|| format!("'{}' is not a usable font", path.display()))?;
    info!(
        path = %path.display(),
        glyphs = face.number_of_glyphs(),
        "Font loaded"
    );

    Ok(FontBlob::new(data))
}
