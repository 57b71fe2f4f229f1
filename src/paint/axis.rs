//! Axis rendering: evenly spaced ticks with clamped numeric labels.

use image::RgbImage;
use imageproc::drawing::draw_line_segment_mut;
use tracing::debug;

use crate::error::Result;
use crate::paint::text::generate_numeric_text;
use crate::style::{PaintConfig, DEFAULT_AXIS_NUMBER_SIZE};
use crate::utils::linspace;

/// Minimum pixel distance between two neighboring ticks.
const MINIMUM_PIXELS_BETWEEN_TICKS: u32 = 15;
/// Upper bound on the number of ticks per axis.
const MAX_TICK_COUNT: usize = 6;
/// Length of the tick mark perpendicular to the axis.
pub(crate) const TICK_LINE_LENGTH: u32 = 5;

/// Ticks that fit into `available` pixels, clamped to `2..=MAX_TICK_COUNT`.
///
/// The lower clamp guarantees both range endpoints are always labeled and
/// keeps the spacing denominator nonzero on very narrow canvases.
fn tick_count(available: u32) -> usize {
    ((available / MINIMUM_PIXELS_BETWEEN_TICKS) as usize).clamp(2, MAX_TICK_COUNT)
}

/// Copy only the inked (non-background) pixels of a label onto the canvas.
///
/// Labels are rendered on their own white canvases; copying them wholesale
/// would wipe whatever the plot already drew underneath.
fn blit_label(cfg: &PaintConfig, canvas: &mut RgbImage, label: &RgbImage, x: u32, y: u32) {
    for (col, row, pixel) in label.enumerate_pixels() {
        if *pixel != cfg.background {
            let (dst_x, dst_y) = (x + col, y + row);
            if dst_x < canvas.width() && dst_y < canvas.height() {
                canvas.put_pixel(dst_x, dst_y, *pixel);
            }
        }
    }
}

/// Draw tick marks and numeric labels along the bottom (X) and left (Y)
/// edges of `canvas`.
///
/// `x_start` / `y_start` are the pixels reserved before the first tick: the
/// Y-label column on the left and any headroom at the top. X values ascend
/// left to right; Y values descend top to bottom, so the data maximum sits at
/// the top the way plots are conventionally read even though pixel rows grow
/// downward. Every label is pinned inside the canvas bounds.
#[allow(clippy::too_many_arguments)]
pub fn add_axis(
    cfg: &PaintConfig,
    canvas: &mut RgbImage,
    x_start: u32,
    y_start: u32,
    x_range: (f64, f64),
    y_range: (f64, f64),
    precision_x: u8,
    precision_y: u8,
) -> Result<()> {
    let (width, height) = (canvas.width(), canvas.height());
    let bottom = height.saturating_sub(1);
    let tick_end_y = bottom.saturating_sub(TICK_LINE_LENGTH);

    let ticks_x = tick_count(width.saturating_sub(x_start));
    let ticks_y = tick_count(height.saturating_sub(y_start));
    debug!(ticks_x, ticks_y, width, height, "axis tick layout");

    // X axis: ascending values, ascending pixel columns.
    let x_values = linspace(x_range.0, x_range.1, ticks_x)?;
    let x_positions = linspace(x_start as f64, bottom_edge(width), ticks_x)?;
    for (value, position) in x_values.iter().zip(&x_positions) {
        let px = position.round() as f32;
        draw_line_segment_mut(canvas, (px, bottom as f32), (px, tick_end_y as f32), cfg.frame);

        let label = generate_numeric_text(cfg, DEFAULT_AXIS_NUMBER_SIZE, *value, precision_x)?;
        let label_x = (position.round() as i64 - label.width() as i64 / 2)
            .clamp(0, width.saturating_sub(label.width()) as i64) as u32;
        let label_y = tick_end_y.saturating_sub(label.height());
        blit_label(cfg, canvas, &label, label_x, label_y);
    }

    // Y axis: descending values, ascending pixel rows (data max at the top).
    let y_values = linspace(y_range.1, y_range.0, ticks_y)?;
    let y_positions = linspace(y_start as f64, bottom_edge(height), ticks_y)?;
    for (value, position) in y_values.iter().zip(&y_positions) {
        let py = position.round() as f32;
        draw_line_segment_mut(canvas, (0.0, py), (TICK_LINE_LENGTH as f32, py), cfg.frame);

        let label = generate_numeric_text(cfg, DEFAULT_AXIS_NUMBER_SIZE, *value, precision_y)?;
        let label_y = (position.round() as i64 - label.height() as i64 / 2)
            .clamp(0, height.saturating_sub(label.height()) as i64) as u32;
        blit_label(cfg, canvas, &label, TICK_LINE_LENGTH + 2, label_y);
    }

    Ok(())
}

fn bottom_edge(extent: u32) -> f64 {
    extent.saturating_sub(1) as f64
}
