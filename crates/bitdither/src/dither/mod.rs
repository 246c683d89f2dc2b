//! Dithering algorithms.
//!
//! This module provides the algorithm set: each transform quantizes every
//! channel of a [`PixelBuffer`] to 0 or 255 in place.
//!
//! # Algorithms
//!
//! - **Random**: per-channel comparison against a fresh uniform draw
//! - **Ordered**: per-channel comparison against a tiled [`ThresholdMatrix`]
//! - **Floyd-Steinberg**: error diffusion with the classic 7/3/5/1 kernel
//!
//! # Architecture
//!
//! All algorithms implement the [`Dither`] trait, whose single entry point
//! [`Dither::dither`] takes the buffer and a `colored` flag. When `colored`
//! is false the buffer is desaturated first, so algorithms only ever
//! implement [`Dither::quantize`].
//!
//! # Example
//!
//! ```
//! use bitdither::{Dither, FloydSteinberg, PixelBuffer, Rgb};
//!
//! let mut image = PixelBuffer::filled(4, 4, Rgb::new(200, 90, 30));
//! FloydSteinberg.dither(&mut image, false);
//! assert!(image.pixels().iter().all(|p| p.is_gray()));
//! ```
//!
//! [`ThresholdMatrix`]: crate::ThresholdMatrix

mod floyd_steinberg;
mod kernel;
mod ordered;
mod random;

pub use floyd_steinberg::FloydSteinberg;
pub use kernel::{Kernel, Tap, FLOYD_STEINBERG};
pub use ordered::Ordered;
pub use random::Random;

use crate::buffer::PixelBuffer;
use crate::color::Rgb;

/// Trait for in-place dithering transforms.
///
/// Every algorithm shares the signature `(buffer, colored)` so that a
/// registry, an interactive caller and a batch caller can all dispatch
/// through the same call. Transforms never fail: any buffer that exists is
/// a valid input, including an empty one.
pub trait Dither {
    /// Quantize the buffer in place.
    ///
    /// Called after the grayscale pre-step, so implementations do not need
    /// to special-case color versus grayscale input.
    fn quantize(&self, image: &mut PixelBuffer);

    /// Dither the buffer in place.
    ///
    /// # Arguments
    ///
    /// * `image` - Pixels to transform; exclusively borrowed for the call
    /// * `colored` - When false, every pixel is replaced by its luma before
    ///   quantization, so the result satisfies `r == g == b`
    fn dither(&self, image: &mut PixelBuffer, colored: bool) {
        if !colored {
            image.desaturate();
        }
        self.quantize(image);
    }
}

impl<T: Dither + ?Sized> Dither for Box<T> {
    fn quantize(&self, image: &mut PixelBuffer) {
        (**self).quantize(image)
    }

    fn dither(&self, image: &mut PixelBuffer, colored: bool) {
        (**self).dither(image, colored)
    }
}

/// Map a channel decision to the 1-bit output level.
#[inline]
pub(crate) fn level(on: bool) -> u8 {
    if on {
        255
    } else {
        0
    }
}

/// Per-pixel working state for error diffusion.
///
/// Holds one normalized `[r, g, b]` triple per pixel: the original value
/// divided by 255 plus whatever error earlier pixels have pushed onto it.
/// Values are not clamped; accumulated error can exceed `[0, 1]`.
///
/// The accumulator is created at the start of a single diffusion call and
/// dropped at its end, on every exit path.
#[derive(Debug)]
pub struct ColorAccumulator {
    values: Vec<[f32; 3]>,
    width: usize,
    height: usize,
}

impl ColorAccumulator {
    /// Load the normalized colors of `image`.
    pub fn from_image(image: &PixelBuffer) -> Self {
        Self {
            values: image
                .pixels()
                .iter()
                .map(|p| {
                    [
                        p.r as f32 / 255.0,
                        p.g as f32 / 255.0,
                        p.b as f32 / 255.0,
                    ]
                })
                .collect(),
            width: image.width(),
            height: image.height(),
        }
    }

    /// Accumulated color of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics when `(x, y)` is outside the image. Callers iterate within
    /// bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [f32; 3] {
        self.values[y * self.width + x]
    }

    /// Overwrite the accumulated color of `(x, y)`.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: [f32; 3]) {
        self.values[y * self.width + x] = value;
    }

    /// Add error to the pixel at signed coordinates.
    ///
    /// Returns `false` and discards the error when the target is outside
    /// the image.
    #[inline]
    pub fn add_error(&mut self, x: i64, y: i64, error: [f32; 3]) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        let value = &mut self.values[y as usize * self.width + x as usize];
        for c in 0..3 {
            value[c] += error[c];
        }
        true
    }
}

/// Core error diffusion loop parameterized by kernel.
///
/// Scans rows top to bottom and columns left to right. Each channel of the
/// accumulated color is thresholded at 0.5, the result is written to
/// `image`, and the quantization error is spread over the kernel's
/// neighbours. Neighbours outside the image are skipped and their share of
/// the error is discarded.
///
/// # Returns
///
/// The total signed error discarded at the image boundary, per channel, in
/// normalized units. Only the conservation tests read it; the algorithms
/// drop it.
pub(crate) fn diffuse_with_kernel(image: &mut PixelBuffer, kernel: &Kernel) -> [f32; 3] {
    let width = image.width();
    let height = image.height();
    let mut acc = ColorAccumulator::from_image(image);
    let mut discarded = [0.0f32; 3];

    for y in 0..height {
        for x in 0..width {
            let old = acc.get(x, y);
            let new = old.map(|v| if v > 0.5 { 1.0 } else { 0.0 });
            acc.set(x, y, new);
            image.set(
                x,
                y,
                Rgb::new(
                    level(new[0] > 0.5),
                    level(new[1] > 0.5),
                    level(new[2] > 0.5),
                ),
            );

            let error = [old[0] - new[0], old[1] - new[1], old[2] - new[2]];

            for (dx, dy, share) in kernel.shares(error) {
                if !acc.add_error(x as i64 + dx as i64, y as i64 + dy as i64, share) {
                    for c in 0..3 {
                        discarded[c] += share[c];
                    }
                }
            }
        }
    }

    discarded
}
