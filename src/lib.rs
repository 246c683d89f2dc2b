//! ditherlab - 1-bit dithering workbench
//!
//! Applies the `bitdither` algorithms or user-supplied Lua scripts to PNG
//! images. This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
