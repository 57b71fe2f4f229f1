//! Numeric helpers shared by the layout and axis code.

use crate::error::{PlotError, Result};

/// Generate `count` linearly spaced values from `start` to `end`, both ends
/// included.
///
/// A `count` of 1 yields `[end]`. A `count` of 0 is an error: callers that
/// compute counts from pixel budgets are expected to clamp first.
pub fn linspace(start: f64, end: f64, count: usize) -> Result<Vec<f64>> {
    if count == 0 {
        return Err(PlotError::InvalidArgument(
            "linspace count cannot be zero".into(),
        ));
    }

    let step = (end - start) / count.saturating_sub(1).max(1) as f64;
    let mut out: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
    // Pin the far end exactly; accumulated float error must not leak into
    // axis extremes.
    *out.last_mut().unwrap() = end;
    if count == 1 {
        out[0] = end;
    }
    Ok(out)
}

/// `linspace` variant that derives the count from the integer span of the
/// range: `|end - start| + 1` points.
pub fn linspace_unit(start: f64, end: f64) -> Result<Vec<f64>> {
    let count = (end - start).abs() as usize + 1;
    linspace(start, end, count)
}
