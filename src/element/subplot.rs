//! Subplot element: a row-major grid of other plot elements.

use image::{imageops, Rgb, RgbImage};
use tracing::debug;

use crate::error::{PlotError, Result};
use crate::geometry::CanvasSize;
use crate::paint::{center_element_in_place, Alignment};
use crate::style::PaintConfig;

use super::{
    ElementCore, Plottable, TextField, CANVAS_HEIGHT_PADDING, CANVAS_WIDTH_PADDING,
};

/// Vertical gap between the title block and the grid.
const PADDING_TITLE_SUBPLOT: u32 = 10;

/// A grid of plot elements composited onto one canvas.
///
/// Cell `(r, c)` holds element `r * cols + c`. Children keep their own sizes;
/// the grid reconciles them per row and column at render time, working on
/// clones so the caller's elements are never resized in place.
#[derive(Clone)]
pub struct Subplot {
    core: ElementCore,
    rows: usize,
    cols: usize,
    elements: Vec<Plottable>,
}

impl Subplot {
    /// Build a `rows` x `cols` grid from row-major `elements`.
    pub fn new(elements: Vec<Plottable>, rows: usize, cols: usize) -> Result<Self> {
        if elements.is_empty() {
            return Err(PlotError::EmptyInput("subplot elements"));
        }
        if rows * cols != elements.len() {
            return Err(PlotError::InvalidArgument(format!(
                "{rows}x{cols} grid cannot hold {} elements",
                elements.len()
            )));
        }
        Ok(Self {
            core: ElementCore::default(),
            rows,
            cols,
            elements,
        })
    }

    /// Read access to a child by its row-major index.
    pub fn element(&self, index: usize) -> Option<&Plottable> {
        self.elements.get(index)
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.core.canvas_size
    }

    pub fn set_canvas_size(&mut self, size: CanvasSize) {
        self.core.canvas_size = size;
    }

    /// Assign a text field. Only the title is rendered at grid level; axis
    /// texts belong to the children.
    pub fn set_text(&mut self, field: TextField, text: impl Into<String>, size: f32, color: Rgb<u8>) {
        self.core.set_text(field, text, size, color);
    }

    /// The rendered canvas; empty until [`Self::generate`] runs.
    pub fn canvas(&self) -> &RgbImage {
        &self.core.canvas
    }

    /// Composite the grid from the current children.
    pub fn generate(&mut self) -> Result<&RgbImage> {
        let cfg = PaintConfig::shared();

        // Children that were never rendered get a first pass at their own
        // current target size; already-rendered ones keep their canvas.
        for element in &mut self.elements {
            if !element.is_rendered() {
                element.generate()?;
            }
        }

        let row_heights = self.largest_rows();
        let col_widths = self.largest_columns();
        let grid_height: u32 = row_heights.iter().sum();
        let grid_width: u32 = col_widths.iter().sum();

        let title = self.core.render_label(cfg, TextField::Title)?;
        let title_block = title
            .as_ref()
            .map(|t| t.height() + PADDING_TITLE_SUBPLOT)
            .unwrap_or(0);
        let title_width = title.as_ref().map(|t| t.width()).unwrap_or(0);

        let minimum = CanvasSize::new(
            title_width.max(grid_width) + 2 * CANVAS_WIDTH_PADDING,
            grid_height + title_block + 2 * CANVAS_HEIGHT_PADDING,
        );
        let final_size = self.core.settle_size(minimum);
        debug!(
            %minimum, %final_size,
            rows = self.rows, cols = self.cols,
            "subplot canvas settled"
        );

        let mut canvas = RgbImage::from_pixel(final_size.width, final_size.height, cfg.background);
        let mut row_counter = CANVAS_HEIGHT_PADDING;

        if let Some(mut title) = title {
            let title_height = title.height();
            center_element_in_place(
                cfg,
                &mut title,
                CanvasSize::new(final_size.width, 0),
                Alignment::WidthOnly,
            )?;
            imageops::replace(&mut canvas, &title, 0, row_counter as i64);
            row_counter += title_height + PADDING_TITLE_SUBPLOT;
        }

        // Each cell renders a clone forced to the reconciled cell size. The
        // stored children stay untouched.
        let mut accumulated_height = 0u32;
        for r in 0..self.rows {
            let mut accumulated_width = 0u32;
            for c in 0..self.cols {
                let cell = CanvasSize::new(col_widths[c], row_heights[r]);
                let mut clone = self.elements[r * self.cols + c].clone();
                clone.set_canvas_size(cell);
                let cell_canvas = clone.generate()?;
                imageops::replace(
                    &mut canvas,
                    cell_canvas,
                    (CANVAS_WIDTH_PADDING + accumulated_width) as i64,
                    (row_counter + accumulated_height) as i64,
                );
                accumulated_width += col_widths[c];
            }
            accumulated_height += row_heights[r];
        }

        self.core.canvas = canvas;
        Ok(&self.core.canvas)
    }

    /// Tallest child canvas per grid row.
    fn largest_rows(&self) -> Vec<u32> {
        (0..self.rows)
            .map(|r| {
                (0..self.cols)
                    .map(|c| self.elements[r * self.cols + c].canvas_size().height)
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Widest child canvas per grid column.
    fn largest_columns(&self) -> Vec<u32> {
        (0..self.cols)
            .map(|c| {
                (0..self.rows)
                    .map(|r| self.elements[r * self.cols + c].canvas_size().width)
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}
