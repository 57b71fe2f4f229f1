//! Histogram element: owns bin counts and edges, renders a bar plot.

use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use ndarray::Array2;
use tracing::debug;

use crate::error::{PlotError, Result};
use crate::geometry::CanvasSize;
use crate::paint::text::allocate_numeric_text_space;
use crate::paint::{add_axis, center_element_in_place, Alignment};
use crate::style::{PaintConfig, DEFAULT_AXIS_NUMBER_SIZE};
use crate::utils::linspace;

use super::{AxisKind, ElementCore, TextField, CANVAS_HEIGHT_PADDING, CANVAS_WIDTH_PADDING};

/// Vertical gap between the title block and the plot body.
const PADDING_TITLE_HISTOGRAM: u32 = 10;
/// Vertical gap between the plot body and the x-axis text block.
const PADDING_HISTOGRAM_XAXIS: u32 = 10;
/// The plot body never renders shorter than this.
const MINIMUM_HISTOGRAM_HEIGHT: u32 = 200;
/// Fraction of the body height the tallest bar may reach; the rest is
/// headroom so the bar never touches the frame.
const BAR_HEIGHT_FRACTION: f64 = 0.95;
/// Outward padding applied to an auto-derived bin bound.
const AUTO_RANGE_PADDING: f64 = 0.05;
/// Width tolerance for reserved numeric label columns.
const AXIS_LABEL_TOLERANCE: f32 = 1.25;

/// A histogram plot element.
///
/// Holds an ordered sequence of bin counts and a parallel sequence of bin
/// edge values; both are always the same non-zero length.
#[derive(Clone)]
pub struct Histogram {
    core: ElementCore,
    counts: Vec<usize>,
    bins: Vec<f64>,
}

impl Histogram {
    /// Build from explicit counts and bin edges.
    pub fn new(counts: Vec<usize>, bins: Vec<f64>) -> Result<Self> {
        if counts.is_empty() {
            return Err(PlotError::EmptyInput("histogram counts"));
        }
        if counts.len() != bins.len() {
            return Err(PlotError::LengthMismatch {
                counts: counts.len(),
                bins: bins.len(),
            });
        }
        Ok(Self {
            core: ElementCore::default(),
            counts,
            bins,
        })
    }

    /// Build from counts alone; bins become the synthetic sequence `1..=N`.
    pub fn from_counts(counts: Vec<usize>) -> Result<Self> {
        if counts.is_empty() {
            return Err(PlotError::EmptyInput("histogram counts"));
        }
        let bins = (1..=counts.len()).map(|b| b as f64).collect();
        Ok(Self {
            core: ElementCore::default(),
            counts,
            bins,
        })
    }

    /// Build from counts plus a linear bin range. A missing `bin_end`
    /// defaults to `bin_start + counts.len()`.
    pub fn with_bin_range(counts: Vec<usize>, bin_start: f64, bin_end: Option<f64>) -> Result<Self> {
        if counts.is_empty() {
            return Err(PlotError::EmptyInput("histogram counts"));
        }
        let bin_end = bin_end.unwrap_or(bin_start + counts.len() as f64);
        let bins = linspace(bin_start, bin_end, counts.len())?;
        Ok(Self {
            core: ElementCore::default(),
            counts,
            bins,
        })
    }

    /// Compute the histogram of a raw matrix.
    ///
    /// Bounds that are not supplied are taken from the data with ~5% outward
    /// padding so extreme samples do not sit on the plot frame. A missing
    /// `bin_count` defaults to the integer span of the range. Samples outside
    /// `[start, end]` are discarded; the final edge is inclusive.
    pub fn from_array(
        data: &Array2<f64>,
        bin_count: Option<usize>,
        bin_start: Option<f64>,
        bin_end: Option<f64>,
    ) -> Result<Self> {
        if bin_count == Some(0) {
            return Err(PlotError::InvalidArgument(
                "number of bins cannot be zero".into(),
            ));
        }
        if data.is_empty() {
            return Err(PlotError::EmptyInput("histogram source array"));
        }

        // Auto-range only when at least one bound is missing.
        let (data_min, data_max) = if bin_start.is_none() || bin_end.is_none() {
            data.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
        } else {
            (0.0, 0.0)
        };

        let pad_low = |v: f64| {
            if v > 0.0 {
                v * (1.0 - AUTO_RANGE_PADDING)
            } else {
                v * (1.0 + AUTO_RANGE_PADDING)
            }
        };
        let pad_high = |v: f64| {
            if v > 0.0 {
                v * (1.0 + AUTO_RANGE_PADDING)
            } else {
                v * (1.0 - AUTO_RANGE_PADDING)
            }
        };

        let start = bin_start.unwrap_or_else(|| pad_low(data_min));
        let end = bin_end.unwrap_or_else(|| pad_high(data_max));
        if start > end {
            return Err(PlotError::RangeViolation(format!(
                "bin range start {start} exceeds end {end}"
            )));
        }
        let bin_count = bin_count.unwrap_or(((end - start) + 1.0).max(1.0) as usize);

        let span = end - start;
        let mut counts = vec![0usize; bin_count];
        for &value in data.iter() {
            if value < start || value > end {
                continue;
            }
            let index = if span == 0.0 {
                0
            } else {
                (((value - start) / span) * bin_count as f64) as usize
            };
            counts[index.min(bin_count - 1)] += 1;
        }

        let bins = linspace(start, end, bin_count)?;
        Ok(Self {
            core: ElementCore::default(),
            counts,
            bins,
        })
    }

    /// The bin counts.
    pub fn histogram(&self) -> &[usize] {
        &self.counts
    }

    /// The bin edge values, parallel to [`Self::histogram`].
    pub fn bins(&self) -> &[f64] {
        &self.bins
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.core.canvas_size
    }

    /// Request a canvas size. The element still never renders smaller than
    /// its content requires.
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

    /// Render the histogram from the current field values.
    pub fn generate(&mut self) -> Result<&RgbImage> {
        if self.counts.is_empty() || self.bins.is_empty() {
            return Err(PlotError::EmptyInput("histogram counts"));
        }
        let cfg = PaintConfig::shared();

        // Text canvases first: their footprints feed the minimum size.
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

        let minimum = self.minimum_canvas_size(&title, &x_axis_text, x_number_space, y_number_space);
        let final_size = self.core.settle_size(minimum);
        debug!(%minimum, %final_size, bins = self.bins.len(), "histogram canvas settled");

        let mut canvas = RgbImage::from_pixel(final_size.width, final_size.height, cfg.background);
        let mut row = CANVAS_HEIGHT_PADDING;

        if let Some(mut title) = title {
            let title_height = title.height();
            center_element_in_place(
                cfg,
                &mut title,
                CanvasSize::new(final_size.width, 0),
                Alignment::WidthOnly,
            )?;
            imageops::replace(&mut canvas, &title, 0, row as i64);
            row += title_height + PADDING_TITLE_HISTOGRAM;
        }

        let title_height = self.core.render_height(&self.core.title);
        let x_text_height = self.core.render_height(&self.core.x_axis_text);
        let mut body = self.plot_body(
            cfg,
            title_height,
            x_text_height,
            x_number_space,
            y_number_space,
        )?;
        let body_height = body.height();
        center_element_in_place(
            cfg,
            &mut body,
            CanvasSize::new(final_size.width, 0),
            Alignment::WidthOnly,
        )?;
        imageops::replace(&mut canvas, &body, 0, row as i64);
        row += body_height + PADDING_HISTOGRAM_XAXIS;

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
    ) -> CanvasSize {
        let title_block = title
            .as_ref()
            .map(|t| t.height() + PADDING_TITLE_HISTOGRAM)
            .unwrap_or(0);
        let x_text_block = x_axis_text
            .as_ref()
            .map(|t| t.height() + PADDING_HISTOGRAM_XAXIS)
            .unwrap_or(0);

        // One pixel per bin is the narrowest body that can still draw bars.
        let body_width = self.bins.len() as u32 + y_number_space.width;
        let title_width = title.as_ref().map(|t| t.width()).unwrap_or(0);
        let x_text_width = x_axis_text.as_ref().map(|t| t.width()).unwrap_or(0);

        let height = 2 * CANVAS_HEIGHT_PADDING
            + title_block
            + MINIMUM_HISTOGRAM_HEIGHT
            + x_number_space.height
            + x_text_block;
        let width =
            title_width.max(body_width).max(x_text_width) + 2 * CANVAS_WIDTH_PADDING;
        CanvasSize::new(width, height)
    }

    /// Render the bar plot with its reserved axis-label margins.
    fn plot_body(
        &self,
        cfg: &PaintConfig,
        title_height: u32,
        x_text_height: u32,
        x_number_space: CanvasSize,
        y_number_space: CanvasSize,
    ) -> Result<RgbImage> {
        let CanvasSize { width, height } = self.core.canvas_size;
        let fixed_padding = 2 * CANVAS_HEIGHT_PADDING + PADDING_TITLE_HISTOGRAM + PADDING_HISTOGRAM_XAXIS;

        let plot_width = width - 2 * CANVAS_WIDTH_PADDING - y_number_space.width;
        let plot_height = height
            .saturating_sub(fixed_padding)
            .saturating_sub(title_height)
            .saturating_sub(x_number_space.height)
            .saturating_sub(x_text_height)
            .max(1);

        let mut out = RgbImage::from_pixel(
            plot_width + y_number_space.width,
            plot_height + x_number_space.height,
            cfg.background,
        );
        let plot_left = y_number_space.width;

        draw_hollow_rect_mut(
            &mut out,
            Rect::at(plot_left as i32, 0).of_size(plot_width, plot_height),
            cfg.frame,
        );

        // All-zero histograms draw an empty frame instead of dividing by zero.
        let max_count = self.counts.iter().copied().max().unwrap_or(0).max(1);
        let padded_height = (plot_height as f64 * BAR_HEIGHT_FRACTION).floor();

        let bin_width = plot_width / self.counts.len() as u32;
        let bars_start = (plot_width - bin_width * self.counts.len() as u32) / 2;

        for (index, &count) in self.counts.iter().enumerate() {
            let bar_height = (padded_height * count as f64 / max_count as f64).round() as u32;
            if bar_height == 0 || bin_width == 0 {
                continue;
            }
            let x = plot_left + bars_start + index as u32 * bin_width;
            let y = plot_height - bar_height;
            draw_filled_rect_mut(
                &mut out,
                Rect::at(x as i32, y as i32).of_size(bin_width, bar_height),
                cfg.frame,
            );
        }

        let headroom = plot_height - padded_height as u32;
        add_axis(
            cfg,
            &mut out,
            plot_left + bars_start,
            headroom,
            (self.bins[0], self.bins[self.bins.len() - 1]),
            (0.0, max_count as f64),
            self.core.precision_x,
            self.core.precision_y,
        )?;

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_round_trip_accessors() {
        let counts = vec![1usize, 1, 5, 10];
        let bins = vec![-5.0, 0.0, 5.0, 10.0];
        let hist = Histogram::new(counts.clone(), bins.clone()).unwrap();
        assert_eq!(hist.histogram(), counts.as_slice());
        assert_eq!(hist.bins(), bins.as_slice());
    }

    #[test]
    fn test_length_mismatch_fails() {
        let result = Histogram::new(vec![1, 1, 5, 10], vec![-5.0, 0.0, 5.0]);
        assert!(matches!(
            result,
            Err(PlotError::LengthMismatch { counts: 4, bins: 3 })
        ));
    }

    #[test]
    fn test_empty_counts_fail() {
        assert!(matches!(
            Histogram::new(vec![], vec![]),
            Err(PlotError::EmptyInput(_))
        ));
        assert!(matches!(
            Histogram::from_counts(vec![]),
            Err(PlotError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_from_counts_synthesizes_unit_bins() {
        let hist = Histogram::from_counts(vec![3, 1, 4, 1, 5]).unwrap();
        assert_eq!(hist.bins(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_bin_range_spans_inclusively() {
        let hist = Histogram::with_bin_range(vec![1, 2, 3, 4], -2.0, Some(4.0)).unwrap();
        assert_eq!(hist.bins().len(), 4);
        assert_relative_eq!(hist.bins()[0], -2.0);
        assert_relative_eq!(*hist.bins().last().unwrap(), 4.0);
    }

    #[test]
    fn test_bin_range_default_end() {
        let hist = Histogram::with_bin_range(vec![1, 2, 3], 10.0, None).unwrap();
        assert_relative_eq!(*hist.bins().last().unwrap(), 13.0);
    }

    fn gradient_matrix() -> Array2<f64> {
        Array2::from_shape_fn((200, 100), |(_, c)| c as f64)
    }

    #[test]
    fn test_from_array_bin_count() {
        let hist = Histogram::from_array(&gradient_matrix(), Some(100), None, None).unwrap();
        assert_eq!(hist.bins().len(), 100);
        assert_eq!(hist.histogram().len(), 100);
        assert_eq!(hist.histogram().iter().sum::<usize>(), 200 * 100);
    }

    #[test]
    fn test_from_array_zero_bins_fails() {
        let result = Histogram::from_array(&gradient_matrix(), Some(0), None, None);
        assert!(matches!(result, Err(PlotError::InvalidArgument(_))));
    }

    #[test]
    fn test_from_array_empty_fails() {
        let empty = Array2::<f64>::zeros((0, 0));
        assert!(matches!(
            Histogram::from_array(&empty, None, None, None),
            Err(PlotError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_from_array_single_bin() {
        let hist = Histogram::from_array(&gradient_matrix(), Some(1), None, None).unwrap();
        assert_eq!(hist.histogram(), &[200 * 100]);
    }

    #[test]
    fn test_from_array_explicit_start_is_kept() {
        let hist =
            Histogram::from_array(&gradient_matrix(), None, Some(-100.5), None).unwrap();
        let min_bin = hist.bins().iter().cloned().fold(f64::INFINITY, f64::min);
        assert_relative_eq!(min_bin, -100.5);
    }

    #[test]
    fn test_from_array_explicit_end_is_kept() {
        let hist = Histogram::from_array(&gradient_matrix(), None, None, Some(111.5)).unwrap();
        let max_bin = hist.bins().iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_relative_eq!(max_bin, 111.5, epsilon = 1e-9);
    }

    #[test]
    fn test_from_array_inverted_bounds_fail() {
        let result =
            Histogram::from_array(&gradient_matrix(), None, Some(-100.5), Some(-101.5));
        assert!(matches!(result, Err(PlotError::RangeViolation(_))));
    }

    #[test]
    fn test_from_array_auto_range_pads_outward() {
        let data = Array2::from_elem((2, 2), 100.0);
        let hist = Histogram::from_array(&data, Some(10), None, None).unwrap();
        assert!(hist.bins()[0] <= 95.0 + 1e-9);
        assert!(*hist.bins().last().unwrap() >= 105.0 - 1e-9);
        // Every sample still lands in a bin.
        assert_eq!(hist.histogram().iter().sum::<usize>(), 4);
    }

    #[test]
    fn test_generate_meets_minimum_and_request() {
        let mut hist = Histogram::from_counts(vec![2, 8, 5, 1]).unwrap();
        hist.set_canvas_size(CanvasSize::new(0, 0));
        hist.generate().unwrap();
        let natural = hist.canvas_size();
        assert!(natural.width > 0 && natural.height >= MINIMUM_HISTOGRAM_HEIGHT);

        let mut hist = Histogram::from_counts(vec![2, 8, 5, 1]).unwrap();
        hist.set_canvas_size(CanvasSize::new(900, 700));
        let canvas = hist.generate().unwrap();
        assert!(canvas.width() >= 900);
        assert!(canvas.height() >= 700);
    }

    #[test]
    fn test_generate_draws_bars() {
        let mut hist = Histogram::from_counts(vec![1, 10, 3]).unwrap();
        hist.generate().unwrap();
        let inked = hist
            .canvas()
            .pixels()
            .filter(|p| **p != crate::style::WHITE)
            .count();
        assert!(inked > 100, "expected bars and frame, got {inked} inked pixels");
    }

    #[test]
    fn test_generate_with_all_text_fields() {
        let mut hist = Histogram::from_counts(vec![4, 2, 9, 9, 1]).unwrap();
        hist.set_text(TextField::Title, "pixel energies", 1.0, crate::style::BLACK);
        hist.set_text(TextField::XAxis, "energy", 1.0, crate::style::BLACK);
        hist.generate().unwrap();
        assert!(!hist.canvas_size().is_empty());
    }

    #[test]
    fn test_regenerate_tracks_new_size() {
        let mut hist = Histogram::from_counts(vec![1, 2, 3]).unwrap();
        hist.generate().unwrap();
        let first = hist.canvas_size();
        hist.set_canvas_size(CanvasSize::new(first.width + 50, first.height + 50));
        hist.generate().unwrap();
        assert_eq!(hist.canvas().width(), first.width + 50);
        assert_eq!(hist.canvas().height(), first.height + 50);
    }
}
