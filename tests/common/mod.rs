//! Shared helpers for the ditherlab integration tests.
//!
//! Every test binary compiles this module separately, so helpers used by
//! only some binaries would otherwise trigger unused warnings.

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
