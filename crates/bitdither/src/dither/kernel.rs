//! Weighted neighbour tables for error diffusion.

/// One neighbour of the pixel being quantized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tap {
    /// Column offset; may be negative on rows below
    pub dx: i32,
    /// Row offset; never negative
    pub dy: i32,
    /// Numerator of this neighbour's share
    pub weight: u8,
}

impl Tap {
    const fn new(dx: i32, dy: i32, weight: u8) -> Self {
        Self { dx, dy, weight }
    }
}

/// A set of taps plus the common denominator of their weights.
///
/// Every tap must reach a pixel later in raster order, so error never flows
/// back into a pixel that has already been written.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    pub taps: &'static [Tap],
    pub divisor: u8,
}

impl Kernel {
    /// Split `error` into per-tap shares: `(dx, dy, error * weight / divisor)`.
    pub fn shares(&self, error: [f32; 3]) -> impl Iterator<Item = (i32, i32, [f32; 3])> + '_ {
        let divisor = self.divisor as f32;
        self.taps.iter().map(move |t| {
            let factor = t.weight as f32 / divisor;
            (t.dx, t.dy, error.map(|e| e * factor))
        })
    }
}

/// The classic 7/3/5/1 kernel over sixteenths.
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    taps: &[
        Tap::new(1, 0, 7),
        Tap::new(-1, 1, 3),
        Tap::new(0, 1, 5),
        Tap::new(1, 1, 1),
    ],
    divisor: 16,
};
