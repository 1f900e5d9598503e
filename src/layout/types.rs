//! Shared types used across layout modules.

use serde::Serialize;
use tracing::warn;

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    pub fn get(self, axis: Axis) -> u32 {
        match axis {
            Axis::Width => self.w,
            Axis::Height => self.h,
        }
    }

    /// Length of the longest side.
    pub fn longest_side(self) -> u32 {
        self.w.max(self.h)
    }

    /// Whether the width to height ratio is below 1.
    ///
    /// Square sizes count as landscape.
    pub fn is_portrait(self) -> bool {
        self.w < self.h
    }

    /// Height matching `width` at this aspect ratio, rounded down.
    ///
    /// Computed in integers so that the result is the exact floor, with no drift from
    /// intermediate floating point aspect ratios. `self.w` must be non-zero.
    pub fn height_for_width(self, width: u32) -> u32 {
        scale(width, self.h, self.w)
    }

    /// Width matching `height` at this aspect ratio, rounded down. `self.h` must be non-zero.
    pub fn width_for_height(self, height: u32) -> u32 {
        scale(height, self.w, self.h)
    }
}

fn scale(value: u32, num: u32, den: u32) -> u32 {
    let scaled = u64::from(value) * u64::from(num) / u64::from(den);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Axis of a photo along which a size is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Width,
    Height,
}

/// Ratio of physical device pixels to logical pixels.
///
/// Always finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct DevicePixelRatio(f64);

impl DevicePixelRatio {
    pub const STANDARD: Self = Self(1.);

    /// Creates a pixel ratio, treating nonsensical host values as standard density.
    pub fn new(ratio: f64) -> Self {
        if ratio.is_finite() && ratio > 0. {
            Self(ratio)
        } else {
            warn!("host reported device pixel ratio {ratio}, using 1");
            Self::STANDARD
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Whether a logical pixel maps to more than one device pixel.
    pub fn is_high_density(self) -> bool {
        self.0 > 1.
    }
}

impl Default for DevicePixelRatio {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Viewport measurements supplied by the host platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    /// Usable width in logical pixels, excluding the scrollbar.
    pub width: u32,
    /// Height in logical pixels.
    pub height: u32,
    pub scale: DevicePixelRatio,
}

impl ViewportGeometry {
    pub fn new(width: u32, height: u32, scale: f64) -> Self {
        Self {
            width,
            height,
            scale: DevicePixelRatio::new(scale),
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_pixel_ratio_is_standard() {
        assert_eq!(DevicePixelRatio::new(0.), DevicePixelRatio::STANDARD);
        assert_eq!(DevicePixelRatio::new(-2.), DevicePixelRatio::STANDARD);
        assert_eq!(DevicePixelRatio::new(f64::NAN), DevicePixelRatio::STANDARD);
        assert_eq!(DevicePixelRatio::new(f64::INFINITY), DevicePixelRatio::STANDARD);
        assert_eq!(DevicePixelRatio::new(2.5).get(), 2.5);
    }

    #[test]
    fn aspect_scaling_rounds_down() {
        let size = Size::new(800, 600);
        assert_eq!(size.height_for_width(190), 142);
        assert_eq!(size.height_for_width(380), 285);
        assert_eq!(size.width_for_height(100), 133);
    }

    #[test]
    fn square_is_landscape() {
        assert!(!Size::new(500, 500).is_portrait());
        assert!(Size::new(499, 500).is_portrait());
    }
}
