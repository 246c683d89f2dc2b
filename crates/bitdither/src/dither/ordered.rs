//! Ordered (threshold matrix) dithering.
//!
//! Ordered dithering processes each pixel independently: the only source
//! of spatial variation is the tiled threshold table, so the output is
//! deterministic and periodic with the table's side length.

use super::{level, Dither};
use crate::buffer::PixelBuffer;
use crate::color::Rgb;
use crate::matrix::{ThresholdMatrix, BAYER_16X16, BAYER_2X2, BAYER_4X4, BAYER_8X8};

/// Ordered dithering over any square [`ThresholdMatrix`].
///
/// For pixel `(x, y)` with threshold `t = matrix.threshold(x, y)`, each
/// channel becomes 255 when it is strictly greater than `t`, else 0.
///
/// # Example
///
/// ```
/// use bitdither::{Dither, Ordered, PixelBuffer, Rgb};
///
/// let mut image = PixelBuffer::filled(2, 2, Rgb::gray(128));
/// Ordered::bayer2().dither(&mut image, false);
/// assert_eq!(image.get(0, 0), Some(Rgb::gray(255))); // 128 > 0
/// assert_eq!(image.get(1, 0), Some(Rgb::gray(0)));   // 128 > 192 fails
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordered {
    matrix: ThresholdMatrix,
}

impl Ordered {
    /// Ordered dithering with a custom matrix.
    pub fn new(matrix: ThresholdMatrix) -> Self {
        Self { matrix }
    }

    /// 2x2 Bayer matrix.
    pub fn bayer2() -> Self {
        Self::new(BAYER_2X2)
    }

    /// 4x4 Bayer matrix.
    pub fn bayer4() -> Self {
        Self::new(BAYER_4X4)
    }

    /// 8x8 Bayer matrix.
    pub fn bayer8() -> Self {
        Self::new(BAYER_8X8)
    }

    /// 16x16 threshold matrix.
    pub fn bayer16() -> Self {
        Self::new(BAYER_16X16)
    }

    /// The threshold table in use.
    pub fn matrix(&self) -> &ThresholdMatrix {
        &self.matrix
    }
}

impl Dither for Ordered {
    fn quantize(&self, image: &mut PixelBuffer) {
        let width = image.width();
        if width == 0 {
            return;
        }
        for (i, p) in image.pixels_mut().iter_mut().enumerate() {
            let t = self.matrix.threshold(i % width, i / width);
            *p = Rgb::new(level(p.r > t), level(p.g > t), level(p.b > t));
        }
    }
}
