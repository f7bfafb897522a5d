//! Glyph painting: rustybuzz placements turned into tiny-skia paths.

use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Transform};
use ttf_parser::{GlyphId, OutlineBuilder};

use crate::fitting::{FitError, FontBlob};
use crate::shaping::layout_glyphs;

/// Paints `text` with its left edge at `x` and its baseline at `baseline`.
pub fn fill_text(
    pixmap: &mut Pixmap,
    font: &FontBlob,
    text: &str,
    font_size: f32,
    x: f32,
    baseline: f32,
    paint: &Paint<'_>,
) -> Result<(), FitError> {
    let face = ttf_parser::Face::parse(font.as_bytes(), 0)
        .map_err(|e| FitError::InvalidOracleState(format!("font data could not be parsed: {e}")))?;

    for placement in layout_glyphs(font, text, font_size, x, baseline)? {
        let mut builder =
            GlyphPathBuilder::new(placement.origin_x, placement.origin_y, placement.scale);
        if face
            .outline_glyph(GlyphId(placement.glyph_id), &mut builder)
            .is_none()
        {
            continue;
        }
        let Some(path) = builder.finish() else {
            continue;
        };
        pixmap.fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
    }
    Ok(())
}

/// Font outlines are y-up; the canvas is y-down, so y is flipped around the origin.
struct GlyphPathBuilder {
    builder: PathBuilder,
    origin_x: f32,
    origin_y: f32,
    scale: f32,
}

impl GlyphPathBuilder {
    fn new(origin_x: f32, origin_y: f32, scale: f32) -> Self {
        Self {
            builder: PathBuilder::new(),
            origin_x,
            origin_y,
            scale,
        }
    }

    fn finish(self) -> Option<Path> {
        self.builder.finish()
    }

    fn x(&self, x: f32) -> f32 {
        self.origin_x + x * self.scale
    }

    fn y(&self, y: f32) -> f32 {
        self.origin_y - y * self.scale
    }
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let (px, py) = (self.x(x), self.y(y));
        self.builder.move_to(px, py);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (px, py) = (self.x(x), self.y(y));
        self.builder.line_to(px, py);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (cx, cy, px, py) = (self.x(x1), self.y(y1), self.x(x), self.y(y));
        self.builder.quad_to(cx, cy, px, py);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (c1x, c1y) = (self.x(x1), self.y(y1));
        let (c2x, c2y) = (self.x(x2), self.y(y2));
        let (px, py) = (self.x(x), self.y(y));
        self.builder.cubic_to(c1x, c1y, c2x, c2y, px, py);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
