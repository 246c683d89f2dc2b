//! 8-bit RGB pixel type.
//!
//! Every channel is a `u8`, so the [0, 255] range is enforced by the type
//! itself. Conversions from wider values go through [`Rgb::from_clamped`].

/// A single pixel with three independent 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
}

/// Black, returned for out-of-range reads.
pub const BLACK: Rgb = Rgb::new(0, 0, 0);

/// White, the "on" level of every 1-bit quantizer.
pub const WHITE: Rgb = Rgb::new(255, 255, 255);

impl Rgb {
    /// Create a pixel from 8-bit channel values.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a gray pixel with all three channels set to `v`.
    #[inline]
    pub const fn gray(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Create a pixel from wider integer values, clamping each to 0..=255.
    ///
    /// # Example
    /// ```
    /// use bitdither::Rgb;
    /// assert_eq!(Rgb::from_clamped(-4, 128, 300), Rgb::new(0, 128, 255));
    /// ```
    #[inline]
    pub fn from_clamped(r: i64, g: i64, b: i64) -> Self {
        Self {
            r: r.clamp(0, 255) as u8,
            g: g.clamp(0, 255) as u8,
            b: b.clamp(0, 255) as u8,
        }
    }

    /// Create a pixel from a byte array `[R, G, B]`.
    #[inline]
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    /// Convert to a byte array `[R, G, B]`.
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Luma of this pixel.
    ///
    /// Uses the BT.601 weights `0.299 R + 0.587 G + 0.114 B` in integer
    /// thousandths and truncates toward zero, so gray input maps to itself.
    ///
    /// # Example
    /// ```
    /// use bitdither::Rgb;
    /// assert_eq!(Rgb::new(255, 255, 255).luma(), 255);
    /// assert_eq!(Rgb::new(255, 0, 0).luma(), 76);
    /// ```
    #[inline]
    pub fn luma(self) -> u8 {
        let y = 299 * self.r as u32 + 587 * self.g as u32 + 114 * self.b as u32;
        (y / 1000) as u8
    }

    /// Replace all three channels with this pixel's luma.
    #[inline]
    pub fn desaturated(self) -> Self {
        Self::gray(self.luma())
    }

    /// Whether all three channels are equal.
    #[inline]
    pub fn is_gray(self) -> bool {
        self.r == self.g && self.g == self.b
    }

    /// Channels as an array, for per-channel loops.
    #[inline]
    pub(crate) fn channels(self) -> [u8; 3] {
        self.to_bytes()
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(bytes: [u8; 3]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(color: Rgb) -> Self {
        color.to_bytes()
    }
}
