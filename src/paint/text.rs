//! Text metrics and glyph rendering.
//!
//! Widths are first *estimated* from per-character pixel constants, the text
//! is rendered onto a canvas of that estimated size, and the canvas is then
//! trimmed back to the actual glyph extent. The estimate is a deliberately
//! rough upper bound; the post-render trim is what makes it safe.

use ab_glyph::PxScale;
use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;

use crate::error::{PlotError, Result};
use crate::geometry::CanvasSize;
use crate::style::{PaintConfig, BASE_GLYPH_PX};

/// Canvas height per unit of font size.
const TEXT_CANVAS_HEIGHT_NORM: u32 = 40;
/// Estimated width of a space character per unit of font size.
const SPACE_CHAR_WIDTH: u32 = 30;
/// Estimated width of a non-space character per unit of font size.
const LETTER_WIDTH: u32 = 20;

fn margin(font_size: f32) -> u32 {
    (10.0 * font_size).round() as u32
}

fn glyph_scale(font_size: f32) -> PxScale {
    PxScale::from(BASE_GLYPH_PX * font_size)
}

/// Estimate the canvas footprint of `text` at the given size.
///
/// Upper bound only: the rendered canvas is trimmed to the real extent
/// afterwards. Space and letter widths both scale with the font size.
pub fn allocate_text_space(font_size: f32, text: &str) -> CanvasSize {
    let spaces = text.chars().filter(|c| *c == ' ').count() as u32;
    let letters = text.chars().count() as u32 - spaces;

    let width = ((SPACE_CHAR_WIDTH * spaces + LETTER_WIDTH * letters) as f32 * font_size).round()
        as u32
        + 2 * margin(font_size);
    let height = (TEXT_CANVAS_HEIGHT_NORM as f32 * font_size).round() as u32;

    CanvasSize::new(width, height)
}

/// Render `text` onto a fresh white canvas and trim trailing whitespace.
///
/// Scans from the right edge inward for the first column containing a
/// non-background pixel and keeps one margin beyond it. Fails when the text
/// color equals the white background: the trim scan could not tell glyphs
/// from blank canvas, which is a caller error rather than a rendering edge
/// case.
pub fn generate_text(
    cfg: &PaintConfig,
    font_size: f32,
    text: &str,
    color: Rgb<u8>,
) -> Result<RgbImage> {
    if color == cfg.background {
        return Err(PlotError::UnsupportedColor(
            "text color equals the canvas background".into(),
        ));
    }

    let allocated = allocate_text_space(font_size, text);
    let mut canvas = RgbImage::from_pixel(allocated.width, allocated.height, cfg.background);

    let margin = margin(font_size);
    draw_text_mut(
        &mut canvas,
        color,
        margin as i32,
        margin as i32,
        glyph_scale(font_size),
        &cfg.font,
        text,
    );

    // Find the rightmost column that holds any ink.
    let mut last_inked = 0;
    'scan: for col in (0..allocated.width).rev() {
        for row in 0..allocated.height {
            if *canvas.get_pixel(col, row) != cfg.background {
                last_inked = col;
                break 'scan;
            }
        }
    }

    let trimmed_width = (last_inked + margin).min(allocated.width).max(1);
    Ok(imageops::crop_imm(&canvas, 0, 0, trimmed_width, allocated.height).to_image())
}

/// Format a value at fixed decimal precision, switching to scientific
/// notation outside the comfortable magnitude range.
pub(crate) fn format_numeric(value: f64, precision: u8) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e6).contains(&magnitude) {
        format!("{:.*e}", precision as usize, value)
    } else {
        format!("{:.*}", precision as usize, value)
    }
}

/// Render a numeric label in the fixed accent color.
///
/// The color is not configurable: every tick label across every element uses
/// the same accent so mixed subplots read uniformly.
pub fn generate_numeric_text(
    cfg: &PaintConfig,
    font_size: f32,
    value: f64,
    precision: u8,
) -> Result<RgbImage> {
    generate_text(cfg, font_size, &format_numeric(value, precision), cfg.accent)
}

/// Conservative footprint of a worst-case numeric label at `precision`.
///
/// Used during minimum-size computation before any tick value is known. The
/// tolerance factor widens the estimate to absorb glyph width variance.
pub fn allocate_numeric_text_space(font_size: f32, tolerance: f32, precision: u8) -> CanvasSize {
    // Widest realistic label: sign, leading digit, separator, `precision`
    // fraction digits, scientific suffix.
    let worst_case = format!("-8.{}e-88", "8".repeat(precision as usize));
    let estimate = allocate_text_space(font_size, &worst_case);
    CanvasSize::new(
        (estimate.width as f32 * tolerance).round() as u32,
        estimate.height,
    )
}
