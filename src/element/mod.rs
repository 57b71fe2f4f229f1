//! Plot elements and the shared state they are built from.
//!
//! The element set is fixed and closed, so the group is modeled as the
//! [`Plottable`] sum type with dispatch by `match` rather than an open trait.

use image::{Rgb, RgbImage};

use crate::error::Result;
use crate::geometry::CanvasSize;
use crate::paint::text::{allocate_text_space, generate_text};
use crate::style::{
    PaintConfig, BLACK, DEFAULT_TITLE_SIZE, DEFAULT_XAXIS_SIZE, DEFAULT_YAXIS_SIZE,
};

pub mod colormap;
pub mod histogram;
pub mod subplot;

pub use colormap::{ColorScheme, Colormap};
pub use histogram::Histogram;
pub use subplot::Subplot;

/// Which text slot of an element `set_text` assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Title,
    XAxis,
    YAxis,
}

/// Which axis a precision setting applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    X,
    Y,
}

/// A configured text string: content, relative size and color.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub size: f32,
    pub color: Rgb<u8>,
}

/// Default canvas target before any explicit request or content-derived
/// minimum is applied.
const DEFAULT_CANVAS_SIZE: CanvasSize = CanvasSize {
    width: 640,
    height: 512,
};

/// Outer margin on each vertical edge of an element canvas.
pub(crate) const CANVAS_WIDTH_PADDING: u32 = 10;
/// Outer margin on each horizontal edge of an element canvas.
pub(crate) const CANVAS_HEIGHT_PADDING: u32 = 10;

/// State every plot element carries: target size, rendered canvas, text
/// fields and axis precisions. Elements embed this by composition.
#[derive(Clone)]
pub(crate) struct ElementCore {
    pub canvas_size: CanvasSize,
    pub canvas: RgbImage,
    pub title: Option<TextLabel>,
    pub x_axis_text: Option<TextLabel>,
    pub y_axis_text: Option<TextLabel>,
    pub precision_x: u8,
    pub precision_y: u8,
}

impl Default for ElementCore {
    fn default() -> Self {
        Self {
            canvas_size: DEFAULT_CANVAS_SIZE,
            canvas: RgbImage::new(0, 0),
            title: None,
            x_axis_text: None,
            y_axis_text: None,
            precision_x: 1,
            precision_y: 1,
        }
    }
}

impl ElementCore {
    /// Assign a text field; the stored size is the caller's multiplier scaled
    /// by that field's default.
    pub fn set_text(&mut self, field: TextField, text: impl Into<String>, size: f32, color: Rgb<u8>) {
        let text = text.into();
        let (slot, default_size) = match field {
            TextField::Title => (&mut self.title, DEFAULT_TITLE_SIZE),
            TextField::XAxis => (&mut self.x_axis_text, DEFAULT_XAXIS_SIZE),
            TextField::YAxis => (&mut self.y_axis_text, DEFAULT_YAXIS_SIZE),
        };
        *slot = if text.is_empty() {
            None
        } else {
            Some(TextLabel {
                text,
                size: size * default_size,
                color,
            })
        };
    }

    pub fn set_precision(&mut self, axis: AxisKind, precision: u8) {
        match axis {
            AxisKind::X => self.precision_x = precision,
            AxisKind::Y => self.precision_y = precision,
        }
    }

    /// Render one text field onto its own trimmed canvas, or `None` when the
    /// field is unset.
    pub fn render_label(&self, cfg: &PaintConfig, field: TextField) -> Result<Option<RgbImage>> {
        let label = match field {
            TextField::Title => &self.title,
            TextField::XAxis => &self.x_axis_text,
            TextField::YAxis => &self.y_axis_text,
        };
        label
            .as_ref()
            .map(|l| generate_text(cfg, l.size, &l.text, l.color))
            .transpose()
    }

    /// Canvas height a text field occupies once rendered; 0 when unset.
    /// Trimming only narrows a text canvas, so the allocated height holds.
    pub fn render_height(&self, label: &Option<TextLabel>) -> u32 {
        label
            .as_ref()
            .map(|l| allocate_text_space(l.size, &l.text).height)
            .unwrap_or(0)
    }

    /// Grow the target size to at least the content-derived minimum. An
    /// explicit request larger than the minimum is honored; a smaller one is
    /// overridden.
    pub fn settle_size(&mut self, minimum: CanvasSize) -> CanvasSize {
        self.canvas_size = self.canvas_size.max_per_axis(minimum);
        self.canvas_size
    }
}

/// Grid filler with no content of its own.
///
/// Defaults to a zero-size canvas so it contributes nothing to row/column
/// reconciliation until a subplot assigns it a cell size.
#[derive(Clone, Default)]
pub struct EmptySpace {
    canvas_size: CanvasSize,
    canvas: RgbImage,
}

impl EmptySpace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas_size
    }

    pub fn set_canvas_size(&mut self, size: CanvasSize) {
        self.canvas_size = size;
    }

    pub fn canvas(&self) -> &RgbImage {
        &self.canvas
    }

    /// Always succeeds: a blank white canvas at exactly the target size.
    pub fn generate(&mut self) -> Result<&RgbImage> {
        let cfg = PaintConfig::shared();
        self.canvas = RgbImage::from_pixel(
            self.canvas_size.width,
            self.canvas_size.height,
            cfg.background,
        );
        Ok(&self.canvas)
    }
}

/// The closed set of element kinds a subplot cell can hold.
#[derive(Clone)]
pub enum Plottable {
    Histogram(Histogram),
    Colormap(Colormap),
    Subplot(Subplot),
    EmptySpace(EmptySpace),
}

impl Plottable {
    /// Current canvas target size (the actual size once generated).
    pub fn canvas_size(&self) -> CanvasSize {
        match self {
            Plottable::Histogram(e) => e.canvas_size(),
            Plottable::Colormap(e) => e.canvas_size(),
            Plottable::Subplot(e) => e.canvas_size(),
            Plottable::EmptySpace(e) => e.canvas_size(),
        }
    }

    pub fn set_canvas_size(&mut self, size: CanvasSize) {
        match self {
            Plottable::Histogram(e) => e.set_canvas_size(size),
            Plottable::Colormap(e) => e.set_canvas_size(size),
            Plottable::Subplot(e) => e.set_canvas_size(size),
            Plottable::EmptySpace(e) => e.set_canvas_size(size),
        }
    }

    /// Render (or re-render) the element from its current field values.
    pub fn generate(&mut self) -> Result<&RgbImage> {
        match self {
            Plottable::Histogram(e) => e.generate(),
            Plottable::Colormap(e) => e.generate(),
            Plottable::Subplot(e) => e.generate(),
            Plottable::EmptySpace(e) => e.generate(),
        }
    }

    /// The rendered canvas; empty (0x0) before the first `generate`.
    pub fn canvas(&self) -> &RgbImage {
        match self {
            Plottable::Histogram(e) => e.canvas(),
            Plottable::Colormap(e) => e.canvas(),
            Plottable::Subplot(e) => e.canvas(),
            Plottable::EmptySpace(e) => e.canvas(),
        }
    }

    /// True once `generate` has produced a non-empty canvas.
    ///
    /// EmptySpace reports rendered even at 0x0: its zero-size canvas is its
    /// rendered form, not a pending state.
    pub fn is_rendered(&self) -> bool {
        match self {
            Plottable::EmptySpace(_) => true,
            other => {
                let canvas = other.canvas();
                canvas.width() > 0 && canvas.height() > 0
            }
        }
    }
}

impl From<Histogram> for Plottable {
    fn from(e: Histogram) -> Self {
        Plottable::Histogram(e)
    }
}

impl From<Colormap> for Plottable {
    fn from(e: Colormap) -> Self {
        Plottable::Colormap(e)
    }
}

impl From<Subplot> for Plottable {
    fn from(e: Subplot) -> Self {
        Plottable::Subplot(e)
    }
}

impl From<EmptySpace> for Plottable {
    fn from(e: EmptySpace) -> Self {
        Plottable::EmptySpace(e)
    }
}

/// Default text color for labels.
pub const DEFAULT_TEXT_COLOR: Rgb<u8> = BLACK;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_set_text_scales_by_field_default() {
        let mut core = ElementCore::default();
        core.set_text(TextField::Title, "spectrum", 2.0, BLACK);
        let title = core.title.as_ref().unwrap();
        assert_eq!(title.text, "spectrum");
        assert!((title.size - 2.0 * DEFAULT_TITLE_SIZE).abs() < f32::EPSILON);
    }

    #[test]
    fn test_core_empty_text_clears_field() {
        let mut core = ElementCore::default();
        core.set_text(TextField::XAxis, "pixels", 1.0, BLACK);
        assert!(core.x_axis_text.is_some());
        core.set_text(TextField::XAxis, "", 1.0, BLACK);
        assert!(core.x_axis_text.is_none());
    }

    #[test]
    fn test_core_precision_per_axis() {
        let mut core = ElementCore::default();
        core.set_precision(AxisKind::X, 3);
        assert_eq!(core.precision_x, 3);
        assert_eq!(core.precision_y, 1);
    }

    #[test]
    fn test_empty_space_generates_exact_size() {
        let mut space = EmptySpace::new();
        assert!(space.canvas_size().is_empty());
        space.set_canvas_size(CanvasSize::new(30, 20));
        let canvas = space.generate().unwrap();
        assert_eq!((canvas.width(), canvas.height()), (30, 20));
        assert!(canvas.pixels().all(|p| *p == crate::style::WHITE));
    }

    #[test]
    fn test_settle_size_honors_larger_request() {
        let mut core = ElementCore::default();
        core.canvas_size = CanvasSize::new(1000, 100);
        let settled = core.settle_size(CanvasSize::new(400, 300));
        assert_eq!(settled, CanvasSize::new(1000, 300));
    }
}
