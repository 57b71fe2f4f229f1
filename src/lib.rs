//! Statistical plot rendering onto in-memory RGB canvases.
//!
//! This crate draws histograms, gradient-mapped rasters and grid layouts of
//! both directly into [`image::RgbImage`] buffers. No window system or GUI
//! toolkit is involved: the output is a plain pixel buffer the caller can
//! save, stream or composite further.
//!
//! # Elements
//!
//! - [`Histogram`]: bar plot over explicit counts, a linear bin range, or a
//!   raw data matrix that is binned internally.
//! - [`Colormap`]: a 2D matrix mapped through a [`ColorScheme`] gradient with
//!   a labeled colorbar.
//! - [`Subplot`]: a row-major grid of other elements with per-row and
//!   per-column size reconciliation.
//! - [`EmptySpace`]: a blank grid filler.
//!
//! All four share the same lifecycle: construct, configure text fields and
//! canvas size, then [`generate`](Plottable::generate). Every element is
//! self-sizing: an explicit canvas request is honored when it is large enough
//! and silently grown to the content-derived minimum when it is not.
//!
//! # Example
//!
//! ```
//! use rasterplot::{Histogram, TextField, DEFAULT_TEXT_COLOR};
//!
//! let mut hist = Histogram::from_counts(vec![3, 12, 7, 1])?;
//! hist.set_text(TextField::Title, "pixel response", 1.0, DEFAULT_TEXT_COLOR);
//! let canvas = hist.generate()?;
//! assert!(canvas.width() > 0);
//! # Ok::<(), rasterplot::PlotError>(())
//! ```

pub mod element;
pub mod error;
pub mod geometry;
pub mod paint;
pub mod style;
pub mod utils;

pub use element::{
    AxisKind, ColorScheme, Colormap, EmptySpace, Histogram, Plottable, Subplot, TextField,
    DEFAULT_TEXT_COLOR,
};
pub use error::{PlotError, Result};
pub use geometry::CanvasSize;
pub use paint::{center_element, center_element_in_place, generate_text, Alignment};
