//! Canvas compositing: center a rendered canvas inside a larger allocation.

use image::{imageops, RgbImage};

use crate::error::{PlotError, Result};
use crate::geometry::CanvasSize;
use crate::style::PaintConfig;

/// Which dimensions of the allocation override the target's own size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Center horizontally inside `area.width`; keep the target's height.
    WidthOnly,
    /// Center vertically inside `area.height`; keep the target's width.
    HeightOnly,
    /// Center in both dimensions.
    WholeShape,
}

/// Center `target` inside an `area`-sized white canvas.
///
/// Padding is split evenly per side; odd leftovers go to the top/left. This
/// operation only ever grows a canvas: a resolved dimension smaller than the
/// target's is an error, never a crop.
pub fn center_element(
    cfg: &PaintConfig,
    target: &RgbImage,
    area: CanvasSize,
    alignment: Alignment,
) -> Result<RgbImage> {
    if target.width() == 0 || target.height() == 0 {
        return Err(PlotError::EmptyInput("centering target"));
    }

    let new_height = match alignment {
        Alignment::HeightOnly | Alignment::WholeShape => area.height,
        Alignment::WidthOnly => target.height(),
    };
    let new_width = match alignment {
        Alignment::WidthOnly | Alignment::WholeShape => area.width,
        Alignment::HeightOnly => target.width(),
    };

    if new_height < target.height() || new_width < target.width() {
        return Err(PlotError::RangeViolation(format!(
            "allocation {}x{} cannot hold a {}x{} canvas",
            new_width,
            new_height,
            target.width(),
            target.height()
        )));
    }

    let padding_cols = (new_width - target.width()) / 2;
    let padding_rows = (new_height - target.height()) / 2;

    let mut centered = RgbImage::from_pixel(new_width, new_height, cfg.background);
    imageops::replace(&mut centered, target, padding_cols as i64, padding_rows as i64);
    Ok(centered)
}

/// In-place variant of [`center_element`]; replaces `target` with the
/// centered canvas.
pub fn center_element_in_place(
    cfg: &PaintConfig,
    target: &mut RgbImage,
    area: CanvasSize,
    alignment: Alignment,
) -> Result<()> {
    *target = center_element(cfg, target, area, alignment)?;
    Ok(())
}
