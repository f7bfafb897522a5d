//! Canvas rendering: background compositing, centred text block, debug overlay.
//!
//! # Flow (`text_to_image`)
//! 1. White canvas of the requested size.
//! 2. Background: black when absent, otherwise the image scaled to the canvas
//!    width with its aspect ratio kept (anything below the canvas is clipped).
//! 3. Font size and lines from the fitting engine, painted white as a block
//!    centred vertically, each line centred horizontally.
//! 4. Optional debug overlay, then PNG encoding.
//!
//! All of this is CPU-bound. Handlers call it from `spawn_blocking`.

pub mod glyphs;
pub mod handlers;

use serde_json::json;
use thiserror::Error;
use tiny_skia::{
    Color, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};
use tracing::debug;

use crate::fitting::{
    fit, measure_line, total_lines_height, FitError, FitRequest, FitResult, FontBlob,
    ShapingOracle,
};
use crate::options::RenderOptions;
use crate::render::glyphs::fill_text;

/// Vertical gap added before every line after the first.
const LINE_GAP: f32 = 10.0;
const FIT_SUMMARY_FONT_SIZE: f32 = 15.0;
const OPTIONS_FONT_SIZE: f32 = 12.0;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid canvas: {0}")]
    Canvas(String),

    #[error("Background image could not be decoded: {0}")]
    Background(#[from] image::ImageError),

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error(transparent)]
    Fit(#[from] FitError),
}

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Renders `options.text` onto a fresh canvas and returns the PNG bytes.
pub fn text_to_image(
    oracle: &dyn ShapingOracle,
    font: &FontBlob,
    options: &RenderOptions,
    background: Option<&[u8]>,
) -> Result<Vec<u8>, RenderError> {
    let width = canvas_side("width", options.canvas_width)?;
    let height = canvas_side("height", options.canvas_height)?;

    let mut pixmap = prepare_canvas(width, height)?;
    draw_background(&mut pixmap, background)?;

    let fit = draw_text(&mut pixmap, oracle, font, options)?;
    debug!(
        font_size = fit.font_size,
        lines = fit.lines.len(),
        width,
        height,
        "Text drawn"
    );

    if options.debug {
        draw_debug_info(&mut pixmap, font, options)?;
    }

    encode_png(&pixmap)
}

fn canvas_side(name: &str, value: i64) -> Result<u32, RenderError> {
    u32::try_from(value).map_err(|_| RenderError::Canvas(format!("{name} {value} is out of range")))
}

// ────────────────────────────────────────────────────────────────────────────
// Canvas and background
// ────────────────────────────────────────────────────────────────────────────

pub fn prepare_canvas(width: u32, height: u32) -> Result<Pixmap, RenderError> {
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| RenderError::Canvas(format!("invalid canvas size {width}x{height}")))?;
    pixmap.fill(Color::WHITE);
    Ok(pixmap)
}

pub fn draw_background(pixmap: &mut Pixmap, background: Option<&[u8]>) -> Result<(), RenderError> {
    let Some(data) = background else {
        pixmap.fill(Color::BLACK);
        return Ok(());
    };

    let image = decode_image_to_pixmap(data)?;
    let scale = pixmap.width() as f32 / image.width() as f32;
    pixmap.draw_pixmap(
        0,
        0,
        image.as_ref(),
        &PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        },
        Transform::from_scale(scale, scale),
        None,
    );
    Ok(())
}

fn decode_image_to_pixmap(data: &[u8]) -> Result<Pixmap, RenderError> {
    let rgba = image::load_from_memory(data)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| RenderError::Canvas(format!("background is {width}x{height}")))?;

    for (src, dst) in rgba
        .as_raw()
        .chunks_exact(4)
        .zip(pixmap.data_mut().chunks_exact_mut(4))
    {
        let alpha = src[3];
        dst[0] = premul_u8(src[0], alpha);
        dst[1] = premul_u8(src[1], alpha);
        dst[2] = premul_u8(src[2], alpha);
        dst[3] = alpha;
    }
    Ok(pixmap)
}

fn premul_u8(channel: u8, alpha: u8) -> u8 {
    let prod = (channel as u16) * (alpha as u16) + 127;
    ((prod + (prod >> 8)) >> 8) as u8
}

// ────────────────────────────────────────────────────────────────────────────
// Text
// ────────────────────────────────────────────────────────────────────────────

/// Fits the text into the padded box and paints it. Returns what was painted.
pub fn draw_text(
    pixmap: &mut Pixmap,
    oracle: &dyn ShapingOracle,
    font: &FontBlob,
    options: &RenderOptions,
) -> Result<FitResult, RenderError> {
    let FitResult { font_size, lines } = fit(oracle, &fit_request(options, font))?;

    draw_lines(pixmap, oracle, font, &lines, font_size, options.debug)?;

    if options.debug {
        let summary = json!({ "fontSize": font_size, "lines": lines.len() }).to_string();
        let width = measure_line(oracle, &summary, font, FIT_SUMMARY_FONT_SIZE)?.longest_line_width;
        let x = pixmap.width() as f32 - 10.0 - width;
        let baseline = pixmap.height() as f32 - 20.0;
        fill_text(
            pixmap,
            font,
            &summary,
            FIT_SUMMARY_FONT_SIZE,
            x,
            baseline,
            &solid_paint(255, 255, 255),
        )?;
    }

    Ok(FitResult { font_size, lines })
}

/// The fit job described by a set of render options.
pub fn fit_request(options: &RenderOptions, font: &FontBlob) -> FitRequest {
    FitRequest {
        text: options.text.clone(),
        font: font.clone(),
        initial_font_size: options.initial_font_size as f32,
        max_height: options.max_text_height(),
        max_width: options.max_text_width(),
        no_wrap: options.no_wrap,
    }
}

fn draw_lines(
    pixmap: &mut Pixmap,
    oracle: &dyn ShapingOracle,
    font: &FontBlob,
    lines: &[String],
    font_size: f32,
    debug: bool,
) -> Result<(), RenderError> {
    let canvas_width = pixmap.width() as f32;
    let canvas_height = pixmap.height() as f32;
    let text_paint = solid_paint(255, 255, 255);
    let outline_paint = solid_paint(255, 0, 0);

    let mut baseline = (canvas_height - total_lines_height(oracle, lines, font, font_size)?) / 2.0;
    let mut gap = 0.0;

    for line in lines {
        let metrics = measure_line(oracle, line, font, font_size)?;
        let x = (canvas_width - metrics.longest_line_width) / 2.0;

        baseline += metrics.ascent_height + gap;
        gap = LINE_GAP;

        fill_text(pixmap, font, line, font_size, x, baseline, &text_paint)?;

        if debug {
            stroke_rect(
                pixmap,
                x,
                baseline - metrics.ascent_height,
                metrics.longest_line_width,
                metrics.ascent_height,
                &outline_paint,
            );
        }
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Debug overlay
// ────────────────────────────────────────────────────────────────────────────

/// Red crosshair through the canvas centre and the request options in the corner.
fn draw_debug_info(
    pixmap: &mut Pixmap,
    font: &FontBlob,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    let width = pixmap.width() as f32;
    let height = pixmap.height() as f32;
    let red = solid_paint(255, 0, 0);

    stroke_line(pixmap, (0.0, height / 2.0), (width, height / 2.0), &red);
    stroke_line(pixmap, (width / 2.0, 0.0), (width / 2.0, height), &red);

    let summary = serde_json::to_string(options)
        .map_err(|e| RenderError::Encode(format!("options summary: {e}")))?;
    fill_text(
        pixmap,
        font,
        &summary,
        OPTIONS_FONT_SIZE,
        20.0,
        20.0,
        &solid_paint(255, 255, 255),
    )?;
    Ok(())
}

fn solid_paint(r: u8, g: u8, b: u8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, 255);
    paint.anti_alias = true;
    paint
}

fn stroke_line(pixmap: &mut Pixmap, from: (f32, f32), to: (f32, f32), paint: &Paint<'_>) {
    let mut builder = PathBuilder::new();
    builder.move_to(from.0, from.1);
    builder.line_to(to.0, to.1);
    if let Some(path) = builder.finish() {
        pixmap.stroke_path(&path, paint, &Stroke::default(), Transform::identity(), None);
    }
}

fn stroke_rect(pixmap: &mut Pixmap, x: f32, y: f32, width: f32, height: f32, paint: &Paint<'_>) {
    let Some(rect) = Rect::from_xywh(x, y, width, height) else {
        return;
    };
    let path = PathBuilder::from_rect(rect);
    pixmap.stroke_path(&path, paint, &Stroke::default(), Transform::identity(), None);
}

pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RenderError> {
    pixmap
        .encode_png()
        .map_err(|e| RenderError::Encode(e.to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
