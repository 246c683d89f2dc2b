//! Random threshold dithering.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};

use super::{level, Dither};
use crate::buffer::PixelBuffer;
use crate::color::Rgb;

/// Random threshold dithering.
///
/// Each channel of each pixel is compared against a fresh uniform draw in
/// `0..=255`: the channel becomes 255 when the draw is below it, else 0.
/// Grayscale runs take one draw per pixel and apply it to all three
/// channels, so the output stays gray.
///
/// [`Random::new`] seeds from the wall clock at every call, so its output
/// is intentionally non-deterministic between runs. Use
/// [`Random::with_seed`] for reproducible output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Random {
    seed: Option<u64>,
}

impl Random {
    /// Wall-clock seeded, non-deterministic.
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Deterministic for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// The explicit seed, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed.unwrap_or_else(wall_clock_seed))
    }
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

impl Dither for Random {
    fn quantize(&self, image: &mut PixelBuffer) {
        let mut rng = self.rng();
        for p in image.pixels_mut() {
            let [r, g, b] = p.channels();
            *p = Rgb::new(
                level(rng.gen::<u8>() < r),
                level(rng.gen::<u8>() < g),
                level(rng.gen::<u8>() < b),
            );
        }
    }

    fn dither(&self, image: &mut PixelBuffer, colored: bool) {
        if colored {
            self.quantize(image);
        } else {
            image.desaturate();
            let mut rng = self.rng();
            for p in image.pixels_mut() {
                *p = Rgb::gray(level(rng.gen::<u8>() < p.r));
            }
        }
    }
}
