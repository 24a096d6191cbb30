//! Image decoding and brightness histograms.

pub mod histogram;
pub mod loader;

pub use histogram::*;
pub use loader::*;
