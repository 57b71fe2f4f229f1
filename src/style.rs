//! Paint configuration: font, palette and default text sizes.
//!
//! Everything the drawing primitives need beyond the canvas itself lives in an
//! immutable [`PaintConfig`] record that is built once and passed by reference.
//! There is deliberately no mutable global state.

use ab_glyph::FontRef;
use image::Rgb;
use once_cell::sync::Lazy;

/// Canvas background. Also the color that text rendering treats as "blank"
/// when trimming, which is why it is rejected as a text color.
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
/// Frames, bars and default text.
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
/// Fixed accent color for numeric axis labels.
pub const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);

/// Default relative size multipliers applied by `set_text` per field.
pub const DEFAULT_TITLE_SIZE: f32 = 1.5;
pub const DEFAULT_XAXIS_SIZE: f32 = 1.0;
pub const DEFAULT_YAXIS_SIZE: f32 = 1.0;
/// Size used for every numeric tick label.
pub const DEFAULT_AXIS_NUMBER_SIZE: f32 = 0.6;

/// Pixel height of one glyph row at size multiplier 1.0.
pub(crate) const BASE_GLYPH_PX: f32 = 20.0;

static EMBEDDED_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Immutable configuration injected into the paint primitives.
pub struct PaintConfig {
    /// Label font. Embedded so rendering never depends on system fonts.
    pub font: FontRef<'static>,
    /// Canvas background color.
    pub background: Rgb<u8>,
    /// Frame / bar color.
    pub frame: Rgb<u8>,
    /// Accent color for numeric labels.
    pub accent: Rgb<u8>,
}

static SHARED_CONFIG: Lazy<PaintConfig> = Lazy::new(|| PaintConfig {
    font: FontRef::try_from_slice(EMBEDDED_FONT).expect("embedded DejaVuSans parses"),
    background: WHITE,
    frame: BLACK,
    accent: BLUE,
});

impl PaintConfig {
    /// The process-wide immutable configuration.
    pub fn shared() -> &'static PaintConfig {
        &SHARED_CONFIG
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_config_font_parses() {
        let cfg = PaintConfig::shared();
        assert_eq!(cfg.background, WHITE);
        assert_eq!(cfg.accent, BLUE);
    }
}
