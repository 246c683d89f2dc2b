//! Floyd-Steinberg error diffusion.
//!
//! The whole quantization error of each pixel goes to four neighbours not
//! yet visited. Shares that would land outside the image are dropped, so
//! boundary pixels lose error mass.

use super::{diffuse_with_kernel, Dither, FLOYD_STEINBERG};
use crate::buffer::PixelBuffer;

/// 1-bit Floyd-Steinberg over each channel independently.
///
/// One forward raster pass thresholds the accumulated value of every
/// channel at 0.5 (normalized) and pushes the difference onward with the
/// [`FLOYD_STEINBERG`](super::FLOYD_STEINBERG) weights.
///
/// The working state is a [`ColorAccumulator`](super::ColorAccumulator)
/// with one float triple per pixel, allocated for the call and dropped
/// when it returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FloydSteinberg;

impl Dither for FloydSteinberg {
    fn quantize(&self, image: &mut PixelBuffer) {
        diffuse_with_kernel(image, &FLOYD_STEINBERG);
    }
}
