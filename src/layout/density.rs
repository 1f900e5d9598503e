//! Adaptive density resolution.
//!
//! Decides how many source pixels to request from the image service for a photo shown at a
//! given presentation size on a screen with a given pixel ratio. Requesting too few pixels
//! makes high density screens blurry, requesting too many wastes bandwidth on upsampled
//! images.

use super::types::{Axis, DevicePixelRatio, Size};

/// Policy for choosing the requested source size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DensityMode {
    /// Request a whole multiple of the presentation size, stepping the multiple down while
    /// the source is too small for it. Used for grid thumbnails.
    ConstantSize,
    /// Request as close to a 1:1 mapping of native pixels as the presentation size allows.
    /// Used for the overlay viewer.
    ConstantDensity,
}

/// Resolves the number of source pixels to request along `axis`.
///
/// The result is always at least 1. At standard density the mode is forced to
/// [`DensityMode::ConstantSize`], which then returns exactly `presentation`.
pub fn resolve(
    mode: DensityMode,
    native: Size,
    axis: Axis,
    presentation: u32,
    scale: DevicePixelRatio,
) -> u32 {
    let mode = if scale.is_high_density() {
        mode
    } else {
        DensityMode::ConstantSize
    };

    let size = match mode {
        DensityMode::ConstantSize => constant_size(native.get(axis), presentation, scale),
        DensityMode::ConstantDensity => constant_density(native, axis, presentation, scale),
    };

    size.max(1)
}

fn constant_size(native: u32, presentation: u32, scale: DevicePixelRatio) -> u32 {
    let native = f64::from(native);
    let presentation = f64::from(presentation);

    let mut ratio = scale.get();
    if ratio.floor() > 1. {
        // Step down in whole steps, keeping the fraction, to the largest ratio that fits the
        // source. The integer part never drops below 1.
        let fraction = ratio.fract();
        let fit = fraction + (native / presentation - fraction).floor();
        ratio = fit.max(1. + fraction).min(ratio);
    }

    to_px(presentation * ratio)
}

fn constant_density(native: Size, axis: Axis, presentation: u32, scale: DevicePixelRatio) -> u32 {
    let longest = f64::from(native.longest_side());
    let on_axis = native.get(axis);
    let presentation = f64::from(presentation);
    let scale = scale.get();

    if longest <= presentation {
        // Fits as is, never upsample.
        on_axis
    } else if longest / scale <= presentation {
        // Enough native pixels for a full density render within the bounds.
        to_px(f64::from(on_axis) / scale)
    } else if presentation * scale <= f64::from(on_axis) {
        to_px(presentation * scale)
    } else {
        // Native size falls between the presentation size and its full density size.
        on_axis
    }
}

fn to_px(value: f64) -> u32 {
    // Float to int casts saturate.
    value.floor() as u32
}
