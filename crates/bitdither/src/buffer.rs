//! Mutable width x height grid of RGB pixels.
//!
//! [`PixelBuffer`] is the only image representation the algorithms see.
//! Pixels are stored row-major. Dimensions are fixed at construction: there
//! is no resize, so they cannot change while an algorithm holds the buffer.

use crate::color::{Rgb, BLACK};

/// Error returned when raw pixel data does not match the given dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeMismatch {
    /// Number of bytes (or pixels) the dimensions require
    pub expected: usize,
    /// Number actually supplied
    pub actual: usize,
}

impl std::fmt::Display for SizeMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pixel data length mismatch: expected {}, got {}",
            self.expected, self.actual
        )
    }
}

impl std::error::Error for SizeMismatch {}

/// A mutable grid of [`Rgb`] pixels.
///
/// # Example
///
/// ```
/// use bitdither::{PixelBuffer, Rgb};
///
/// let mut image = PixelBuffer::filled(2, 2, Rgb::gray(128));
/// image.set(1, 0, Rgb::new(255, 0, 0));
/// assert_eq!(image.get(1, 0), Some(Rgb::new(255, 0, 0)));
/// assert_eq!(image.get(5, 5), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl PixelBuffer {
    /// Create a buffer with every pixel set to `color`.
    pub fn filled(width: usize, height: usize, color: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    /// Create a black buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, BLACK)
    }

    /// Wrap an existing row-major pixel vector.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Rgb>) -> Result<Self, SizeMismatch> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a buffer from packed 8-bit RGB bytes (`[R, G, B, R, G, B, ...]`).
    pub fn from_rgb8(width: usize, height: usize, bytes: &[u8]) -> Result<Self, SizeMismatch> {
        let expected = width * height * 3;
        if bytes.len() != expected {
            return Err(SizeMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|c| Rgb::new(c[0], c[1], c[2]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Packed 8-bit RGB bytes, row-major.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_bytes()).collect()
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the buffer has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Row-major pixel slice.
    #[inline]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Mutable row-major pixel slice. Length is fixed.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Pixel at `(x, y)`, or `None` when out of range.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Pixel at signed coordinates, black when out of range.
    ///
    /// This is the total read used by the scripting bindings: negative or
    /// oversized coordinates never fail.
    pub fn get_or_black(&self, x: i64, y: i64) -> Rgb {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(x), Ok(y)) => self.get(x, y).unwrap_or(BLACK),
            _ => BLACK,
        }
    }

    /// Write the pixel at `(x, y)`.
    ///
    /// Returns `false` (and leaves the buffer untouched) when out of range.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, color: Rgb) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixels[i] = color;
                true
            }
            None => false,
        }
    }

    /// Write at signed coordinates; out of range is a no-op returning `false`.
    pub fn set_checked(&mut self, x: i64, y: i64, color: Rgb) -> bool {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(x), Ok(y)) => self.set(x, y, color),
            _ => false,
        }
    }

    /// Replace every pixel with its luma, leaving `r == g == b` everywhere.
    pub fn desaturate(&mut self) {
        for p in &mut self.pixels {
            *p = p.desaturated();
        }
    }

    /// Whether every pixel has equal channels.
    pub fn is_grayscale(&self) -> bool {
        self.pixels.iter().all(|p| p.is_gray())
    }
}
