//! # bitdither
//!
//! 1-bit dithering over plain RGB pixel grids.
//!
//! The crate provides a [`PixelBuffer`] image type, the [`Dither`] trait and
//! three algorithm families behind it:
//!
//! - [`Random`] threshold dithering (wall-clock or explicit seed)
//! - [`Ordered`] dithering over any square [`ThresholdMatrix`], with the
//!   Bayer 2x2, 4x4, 8x8 and 16x16 tables built in
//! - [`FloydSteinberg`] error diffusion
//!
//! Every transform works in place, never fails, and leaves each channel at
//! 0 or 255. The [`AlgorithmRegistry`] collects them in a fixed order for
//! callers that select algorithms by index or key.
//!
//! ## Quick Start
//!
//! ```
//! use bitdither::{AlgorithmRegistry, Dither, Ordered, PixelBuffer, Rgb};
//!
//! let mut image = PixelBuffer::filled(8, 8, Rgb::new(90, 160, 220));
//!
//! // Grayscale ordered dithering
//! Ordered::bayer8().dither(&mut image, false);
//! assert!(image.is_grayscale());
//!
//! // Or by key through the registry
//! let registry = AlgorithmRegistry::standard();
//! let index = registry.resolve("floyd-steinberg").unwrap();
//! registry.apply(index, &mut image, true);
//! ```

pub mod buffer;
pub mod color;
pub mod dither;
pub mod matrix;
pub mod registry;


pub use buffer::{PixelBuffer, SizeMismatch};
pub use color::{Rgb, BLACK, WHITE};
pub use dither::{ColorAccumulator, Dither, FloydSteinberg, Kernel, Ordered, Random, Tap, FLOYD_STEINBERG};
pub use matrix::{MatrixError, ThresholdMatrix, BAYER_16X16, BAYER_2X2, BAYER_4X4, BAYER_8X8};
pub use registry::{AlgorithmEntry, AlgorithmRegistry};
