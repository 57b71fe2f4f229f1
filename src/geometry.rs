//! Pixel dimension utilities shared by all plot elements.

use std::fmt;

/// Width and height of a canvas in pixels.
///
/// Uses `u32` for direct compatibility with `image` buffer dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CanvasSize {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
}

impl CanvasSize {
    /// Create a new CanvasSize
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Total number of pixels
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Per-axis maximum of two sizes.
    ///
    /// Used to reconcile an explicitly requested canvas size with the
    /// computed minimum: the result is large enough for both.
    pub fn max_per_axis(&self, other: CanvasSize) -> CanvasSize {
        CanvasSize {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Convert to tuple (width, height)
    pub fn to_tuple(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl From<(u32, u32)> for CanvasSize {
    fn from(dimensions: (u32, u32)) -> Self {
        Self::new(dimensions.0, dimensions.1)
    }
}

impl From<CanvasSize> for (u32, u32) {
    fn from(size: CanvasSize) -> Self {
        size.to_tuple()
    }
}

impl fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let size = CanvasSize::new(640, 512);
        assert_eq!(size.width, 640);
        assert_eq!(size.height, 512);
    }

    #[test]
    fn test_is_empty() {
        assert!(CanvasSize::default().is_empty());
        assert!(CanvasSize::new(10, 0).is_empty());
        assert!(CanvasSize::new(0, 10).is_empty());
        assert!(!CanvasSize::new(1, 1).is_empty());
    }

    #[test]
    fn test_max_per_axis() {
        let a = CanvasSize::new(100, 50);
        let b = CanvasSize::new(80, 70);
        assert_eq!(a.max_per_axis(b), CanvasSize::new(100, 70));
    }

    #[test]
    fn test_tuple_round_trip() {
        let size = CanvasSize::from((320, 240));
        let tuple: (u32, u32) = size.into();
        assert_eq!(tuple, (320, 240));
    }

    #[test]
    fn test_display() {
        assert_eq!(CanvasSize::new(640, 512).to_string(), "640x512");
    }
}
