//! Threshold matrices for ordered dithering
//!
//! This module provides the square lookup tables used by ordered dithering
//! and the error type for validating custom tables.

mod bayer;
mod error;
mod threshold;

pub use bayer::{BAYER_16X16, BAYER_2X2, BAYER_4X4, BAYER_8X8};
pub use error::MatrixError;
pub use threshold::ThresholdMatrix;
