//! Colormap element: gradient-mapped raster with a labeled colorbar.

use image::{imageops, imageops::FilterType, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use ndarray::Array2;
use tracing::debug;

use crate::error::{PlotError, Result};
use crate::geometry::CanvasSize;
use crate::paint::axis::TICK_LINE_LENGTH;
use crate::paint::text::{allocate_numeric_text_space, generate_numeric_text};
use crate::paint::{add_axis, center_element_in_place, Alignment};
use crate::style::{PaintConfig, DEFAULT_AXIS_NUMBER_SIZE};
use crate::utils::linspace;

use super::{AxisKind, ElementCore, TextField, CANVAS_HEIGHT_PADDING, CANVAS_WIDTH_PADDING};

/// Horizontal gap between the raster frame and the colorbar strip.
const OFFSET_COLORMAP_COLORBAR: u32 = 8;
/// Width of the colorbar gradient strip.
const COLORBAR_WIDTH: u32 = 10;
/// Vertical gap between the title block and the raster body.
const PADDING_TITLE_COLORMAP: u32 = 10;
/// Vertical gap between the raster body and the x-axis text block.
const PADDING_COLORMAP_XAXIS: u32 = 30;
const BORDER_THICKNESS: u32 = 1;
const BORDER_LENGTH: u32 = 2 * BORDER_THICKNESS;
const MAX_COLORBAR_TICKS: u32 = 6;
/// Minimum vertical pixel distance between colorbar tick labels.
const MINIMUM_COLORBAR_TICK_SPACING: u32 = 30;
/// Width tolerance for reserved numeric label columns.
const AXIS_LABEL_TOLERANCE: f32 = 1.25;

/// Gradient used to map normalized sample values to colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    #[default]
    Viridis,
    Inferno,
    Magma,
    Plasma,
    Turbo,
    Cividis,
    Cool,
    Warm,
}

impl ColorScheme {
    fn gradient(self) -> colorous::Gradient {
        match self {
            ColorScheme::Viridis => colorous::VIRIDIS,
            ColorScheme::Inferno => colorous::INFERNO,
            ColorScheme::Magma => colorous::MAGMA,
            ColorScheme::Plasma => colorous::PLASMA,
            ColorScheme::Turbo => colorous::TURBO,
            ColorScheme::Cividis => colorous::CIVIDIS,
            ColorScheme::Cool => colorous::COOL,
            ColorScheme::Warm => colorous::WARM,
        }
    }

    /// Color at normalized position `t` in `[0, 1]`.
    fn sample(self, t: f64) -> Rgb<u8> {
        let (r, g, b) = self.gradient().eval_continuous(t.clamp(0.0, 1.0)).as_tuple();
        Rgb([r, g, b])
    }
}

/// A gradient-mapped raster plot with colorbar.
///
/// The source matrix is mapped through the gradient at construction time; the
/// value range used for normalization is recorded so the colorbar can label
/// it later.
#[derive(Clone)]
pub struct Colormap {
    core: ElementCore,
    image: RgbImage,
    value_range: (f64, f64),
    scheme: ColorScheme,
    colorbar_precision: u8,
}

impl Colormap {
    /// Map `data` through `scheme` over its own full value range.
    pub fn new(data: &Array2<f64>, scheme: ColorScheme) -> Result<Self> {
        if data.is_empty() {
            return Err(PlotError::EmptyInput("colormap source array"));
        }
        let (min, max) = value_bounds(data);
        Ok(Self {
            core: ElementCore::default(),
            image: apply_gradient(data, (min, max), scheme),
            value_range: (min, max),
            scheme,
            colorbar_precision: 1,
        })
    }

    /// Map `data` over an explicit value range. Samples outside the range are
    /// truncated to the nearest bound before normalization. Missing bounds
    /// fall back to the source minimum or maximum.
    pub fn with_bounds(
        data: &Array2<f64>,
        range_min: Option<f64>,
        range_max: Option<f64>,
        scheme: ColorScheme,
    ) -> Result<Self> {
        if data.is_empty() {
            return Err(PlotError::EmptyInput("colormap source array"));
        }
        let (data_min, data_max) = value_bounds(data);
        let min = range_min.unwrap_or(data_min);
        let max = range_max.unwrap_or(data_max);

        if min > max {
            return Err(PlotError::RangeViolation(format!(
                "colormap range minimum {min} exceeds maximum {max}"
            )));
        }
        if data_min > max || data_max < min {
            return Err(PlotError::RangeViolation(format!(
                "no sample falls inside the colormap range [{min}, {max}]"
            )));
        }

        Ok(Self {
            core: ElementCore::default(),
            image: apply_gradient(data, (min, max), scheme),
            value_range: (min, max),
            scheme,
            colorbar_precision: 1,
        })
    }

    /// Decimal precision of the colorbar tick labels.
    pub fn set_colorbar_precision(&mut self, precision: u8) {
        self.colorbar_precision = precision;
    }

    /// The value range the colorbar spans.
    pub fn value_range(&self) -> (f64, f64) {
        self.value_range
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.core.canvas_size
    }

    pub fn set_canvas_size(&mut self, size: CanvasSize) {
        self.core.canvas_size = size;
    }

    pub fn set_text(&mut self, field: TextField, text: impl Into<String>, size: f32, color: Rgb<u8>) {
        self.core.set_text(field, text, size, color);
    }

    pub fn set_precision(&mut self, axis: AxisKind, precision: u8) {
        self.core.set_precision(axis, precision);
    }

    /// The rendered canvas; empty until [`Self::generate`] runs.
    pub fn canvas(&self) -> &RgbImage {
        &self.core.canvas
    }

    /// Render the raster, colorbar and text fields from the current values.
    pub fn generate(&mut self) -> Result<&RgbImage> {
        if self.image.width() == 0 || self.image.height() == 0 {
            return Err(PlotError::EmptyInput("colormap source array"));
        }
        let cfg = PaintConfig::shared();

        let title = self.core.render_label(cfg, TextField::Title)?;
        let x_axis_text = self.core.render_label(cfg, TextField::XAxis)?;
        let x_number_space = allocate_numeric_text_space(
            DEFAULT_AXIS_NUMBER_SIZE,
            AXIS_LABEL_TOLERANCE,
            self.core.precision_x,
        );
        let y_number_space = allocate_numeric_text_space(
            DEFAULT_AXIS_NUMBER_SIZE,
            AXIS_LABEL_TOLERANCE,
            self.core.precision_y,
        );
        let colorbar_number_space = allocate_numeric_text_space(
            DEFAULT_AXIS_NUMBER_SIZE,
            AXIS_LABEL_TOLERANCE,
            self.colorbar_precision,
        );

        let title_height = title.as_ref().map(|t| t.height()).unwrap_or(0);
        let x_text_height = x_axis_text.as_ref().map(|t| t.height()).unwrap_or(0);

        let minimum = self.minimum_canvas_size(
            &title,
            &x_axis_text,
            x_number_space,
            y_number_space,
            colorbar_number_space,
        );
        let final_size = self.core.settle_size(minimum);
        debug!(%minimum, %final_size, range = ?self.value_range, "colormap canvas settled");

        let mut canvas = RgbImage::from_pixel(final_size.width, final_size.height, cfg.background);
        let mut row = CANVAS_HEIGHT_PADDING;

        if let Some(mut title) = title {
            center_element_in_place(
                cfg,
                &mut title,
                CanvasSize::new(final_size.width, 0),
                Alignment::WidthOnly,
            )?;
            imageops::replace(&mut canvas, &title, 0, row as i64);
            row += title.height() + PADDING_TITLE_COLORMAP;
        } else {
            row += PADDING_TITLE_COLORMAP;
        }

        let mut body = self.raster_body(
            cfg,
            title_height,
            x_text_height,
            x_number_space,
            y_number_space,
            colorbar_number_space,
        )?;
        let allocated_height =
            final_size.height - total_height_padding() - title_height - x_text_height;
        center_element_in_place(
            cfg,
            &mut body,
            CanvasSize::new(final_size.width, allocated_height),
            Alignment::WholeShape,
        )?;
        imageops::replace(&mut canvas, &body, 0, row as i64);
        row += body.height() + PADDING_COLORMAP_XAXIS;

        if let Some(mut x_axis_text) = x_axis_text {
            center_element_in_place(
                cfg,
                &mut x_axis_text,
                CanvasSize::new(final_size.width, 0),
                Alignment::WidthOnly,
            )?;
            imageops::replace(&mut canvas, &x_axis_text, 0, row as i64);
        }

        self.core.canvas = canvas;
        Ok(&self.core.canvas)
    }

    fn minimum_canvas_size(
        &self,
        title: &Option<RgbImage>,
        x_axis_text: &Option<RgbImage>,
        x_number_space: CanvasSize,
        y_number_space: CanvasSize,
        colorbar_number_space: CanvasSize,
    ) -> CanvasSize {
        let title_size = title
            .as_ref()
            .map(|t| CanvasSize::new(t.width(), t.height()))
            .unwrap_or_default();
        let x_text_size = x_axis_text
            .as_ref()
            .map(|t| CanvasSize::new(t.width(), t.height()))
            .unwrap_or_default();

        // The raster is never rendered below native resolution.
        let body_height = self.image.height() + BORDER_LENGTH + x_number_space.height;
        let body_width = y_number_space.width
            + BORDER_LENGTH
            + self.image.width()
            + colorbar_total_width(colorbar_number_space);

        let height = title_size.height + body_height + x_text_size.height + total_height_padding();
        let width = title_size
            .width
            .max(body_width)
            .max(x_text_size.width)
            + 2 * CANVAS_WIDTH_PADDING;
        CanvasSize::new(width, height)
    }

    /// Render the framed raster, its axes and the colorbar into one canvas.
    fn raster_body(
        &self,
        cfg: &PaintConfig,
        title_height: u32,
        x_text_height: u32,
        x_number_space: CanvasSize,
        y_number_space: CanvasSize,
        colorbar_number_space: CanvasSize,
    ) -> Result<RgbImage> {
        let CanvasSize { width, height } = self.core.canvas_size;
        let colorbar_width = colorbar_total_width(colorbar_number_space);
        let width_without_raster = colorbar_width + BORDER_LENGTH + y_number_space.width;

        let available_width = width - 2 * CANVAS_WIDTH_PADDING - width_without_raster;
        let available_height = height
            - total_height_padding()
            - title_height
            - x_number_space.height
            - x_text_height
            - BORDER_LENGTH;

        // Fit whichever axis has the smaller zoom headroom exactly; the other
        // follows from the aspect ratio.
        let aspect = self.image.width() as f32 / self.image.height() as f32;
        let zoom_w = available_width as f32 / self.image.width() as f32;
        let zoom_h = available_height as f32 / self.image.height() as f32;
        let (raster_width, raster_height) = if zoom_w >= zoom_h {
            (
                (available_height as f32 * aspect) as u32,
                available_height,
            )
        } else {
            (available_width, (available_width as f32 / aspect) as u32)
        };
        let resized = imageops::resize(
            &self.image,
            raster_width.max(1),
            raster_height.max(1),
            FilterType::Nearest,
        );

        let mut out = RgbImage::from_pixel(
            resized.width() + width_without_raster,
            resized.height() + BORDER_LENGTH + x_number_space.height,
            cfg.background,
        );

        draw_hollow_rect_mut(
            &mut out,
            Rect::at(y_number_space.width as i32, 0).of_size(
                resized.width() + BORDER_LENGTH,
                resized.height() + BORDER_LENGTH,
            ),
            cfg.frame,
        );
        imageops::replace(
            &mut out,
            &resized,
            (y_number_space.width + BORDER_THICKNESS) as i64,
            BORDER_THICKNESS as i64,
        );

        let colorbar = self.colorbar(cfg, resized.height() + BORDER_LENGTH, colorbar_number_space)?;
        let colorbar_left = y_number_space.width + BORDER_LENGTH + resized.width() + OFFSET_COLORMAP_COLORBAR;
        imageops::replace(&mut out, &colorbar, colorbar_left as i64, 0);

        // Axes only span the raster region; the colorbar column is excluded
        // so tick placement is not stretched across it.
        let axis_width = out.width() - colorbar_width;
        let mut axis_region = imageops::crop_imm(&out, 0, 0, axis_width, out.height()).to_image();
        add_axis(
            cfg,
            &mut axis_region,
            y_number_space.width,
            0,
            (0.0, self.image.width() as f64),
            (0.0, self.image.height() as f64),
            self.core.precision_x,
            self.core.precision_y,
        )?;
        imageops::replace(&mut out, &axis_region, 0, 0);

        Ok(out)
    }

    /// Vertical gradient strip with tick lines and value labels; maximum of
    /// the value range at the top.
    fn colorbar(
        &self,
        cfg: &PaintConfig,
        bar_height: u32,
        colorbar_number_space: CanvasSize,
    ) -> Result<RgbImage> {
        let mut out = RgbImage::from_pixel(
            COLORBAR_WIDTH + TICK_LINE_LENGTH + colorbar_number_space.width,
            bar_height,
            cfg.background,
        );

        let denominator = (bar_height - 1).max(1) as f64;
        for row in 0..bar_height {
            let color = self.scheme.sample(1.0 - row as f64 / denominator);
            for col in 0..COLORBAR_WIDTH {
                out.put_pixel(col, row, color);
            }
        }

        let tick_count = (bar_height / MINIMUM_COLORBAR_TICK_SPACING)
            .clamp(1, MAX_COLORBAR_TICKS) as usize;
        let (range_min, range_max) = self.value_range;
        let values = linspace(range_min, range_max, tick_count)?;
        let positions = linspace((bar_height - 1) as f64, 0.0, tick_count)?;

        for (&value, &position) in values.iter().zip(positions.iter()) {
            let y = position as f32;
            draw_line_segment_mut(
                &mut out,
                (COLORBAR_WIDTH as f32, y),
                ((COLORBAR_WIDTH + TICK_LINE_LENGTH) as f32, y),
                cfg.frame,
            );

            let label =
                generate_numeric_text(cfg, DEFAULT_AXIS_NUMBER_SIZE, value, self.colorbar_precision)?;
            let top = (position as u32)
                .saturating_sub(label.height() / 2)
                .min(bar_height.saturating_sub(label.height()));
            imageops::replace(
                &mut out,
                &label,
                (COLORBAR_WIDTH + TICK_LINE_LENGTH) as i64,
                top as i64,
            );
        }

        Ok(out)
    }
}

/// Total horizontal footprint of the colorbar block including its labels.
fn colorbar_total_width(colorbar_number_space: CanvasSize) -> u32 {
    OFFSET_COLORMAP_COLORBAR + COLORBAR_WIDTH + TICK_LINE_LENGTH + colorbar_number_space.width
}

fn total_height_padding() -> u32 {
    2 * CANVAS_HEIGHT_PADDING + PADDING_TITLE_COLORMAP + PADDING_COLORMAP_XAXIS
}

fn value_bounds(data: &Array2<f64>) -> (f64, f64) {
    data.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    })
}

/// Truncate to the range, normalize, and map every sample through the
/// gradient. A degenerate (zero-span) range maps everything to the low end.
fn apply_gradient(data: &Array2<f64>, range: (f64, f64), scheme: ColorScheme) -> RgbImage {
    let (min, max) = range;
    let span = max - min;
    let (rows, cols) = data.dim();

    let mut image = RgbImage::new(cols as u32, rows as u32);
    for ((r, c), &value) in data.indexed_iter() {
        let t = if span == 0.0 {
            0.0
        } else {
            (value.clamp(min, max) - min) / span
        };
        image.put_pixel(c as u32, r as u32, scheme.sample(t));
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::arr2;

    fn ramp() -> Array2<f64> {
        Array2::from_shape_fn((8, 16), |(r, c)| (r * 16 + c) as f64)
    }

    #[test]
    fn test_empty_source_fails() {
        let empty = Array2::<f64>::zeros((0, 0));
        assert!(matches!(
            Colormap::new(&empty, ColorScheme::Viridis),
            Err(PlotError::EmptyInput(_))
        ));
        assert!(matches!(
            Colormap::with_bounds(&empty, None, None, ColorScheme::Viridis),
            Err(PlotError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_records_source_range() {
        let data = arr2(&[[-3.0, 0.0], [7.5, 2.0]]);
        let map = Colormap::new(&data, ColorScheme::default()).unwrap();
        let (min, max) = map.value_range();
        assert_relative_eq!(min, -3.0);
        assert_relative_eq!(max, 7.5);
    }

    #[test]
    fn test_with_bounds_defaults_missing_bound() {
        let data = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        let map = Colormap::with_bounds(&data, Some(0.0), None, ColorScheme::Viridis).unwrap();
        assert_eq!(map.value_range(), (0.0, 4.0));
    }

    #[test]
    fn test_inverted_bounds_fail() {
        let data = arr2(&[[1.0, 2.0]]);
        let result = Colormap::with_bounds(&data, Some(5.0), Some(1.0), ColorScheme::Viridis);
        assert!(matches!(result, Err(PlotError::RangeViolation(_))));
    }

    #[test]
    fn test_disjoint_bounds_fail() {
        let data = arr2(&[[1.0, 2.0]]);
        let result = Colormap::with_bounds(&data, Some(10.0), Some(20.0), ColorScheme::Viridis);
        assert!(matches!(result, Err(PlotError::RangeViolation(_))));
        let result = Colormap::with_bounds(&data, Some(-20.0), Some(-10.0), ColorScheme::Viridis);
        assert!(matches!(result, Err(PlotError::RangeViolation(_))));
    }

    #[test]
    fn test_truncation_pins_out_of_range_samples() {
        let data = arr2(&[[0.0, 2.0, 5.0, 10.0]]);
        let map = Colormap::with_bounds(&data, Some(2.0), Some(5.0), ColorScheme::Viridis).unwrap();
        // Samples below 2.0 share the low-end color; above 5.0 the high end.
        assert_eq!(map.image.get_pixel(0, 0), map.image.get_pixel(1, 0));
        assert_eq!(*map.image.get_pixel(3, 0), ColorScheme::Viridis.sample(1.0));
    }

    #[test]
    fn test_constant_data_maps_to_low_end() {
        let data = Array2::from_elem((2, 3), 42.0);
        let map = Colormap::new(&data, ColorScheme::Turbo).unwrap();
        assert!(map
            .image
            .pixels()
            .all(|p| *p == ColorScheme::Turbo.sample(0.0)));
    }

    #[test]
    fn test_generate_meets_minimum() {
        let mut map = Colormap::new(&ramp(), ColorScheme::Viridis).unwrap();
        map.set_canvas_size(CanvasSize::new(0, 0));
        let canvas = map.generate().unwrap();
        assert!(canvas.width() > 16);
        assert!(canvas.height() > 8);
    }

    #[test]
    fn test_generate_honors_larger_request() {
        let mut map = Colormap::new(&ramp(), ColorScheme::Plasma).unwrap();
        map.set_canvas_size(CanvasSize::new(800, 600));
        map.set_text(TextField::Title, "dark frame", 1.0, crate::style::BLACK);
        map.set_colorbar_precision(2);
        let canvas = map.generate().unwrap();
        assert!(canvas.width() >= 800);
        assert!(canvas.height() >= 600);
    }

    #[test]
    fn test_generate_canvas_holds_gradient_pixels() {
        let mut map = Colormap::new(&ramp(), ColorScheme::Viridis).unwrap();
        map.generate().unwrap();
        let inked = map
            .canvas()
            .pixels()
            .filter(|p| **p != crate::style::WHITE)
            .count();
        // Raster plus colorbar should cover well over the native pixel count.
        assert!(inked > 8 * 16);
    }
}
