//! Histogram plots.
//!
//! Two renderers read the same [`Histogram`](crate::image_loader::Histogram):
//! the console chart groups buckets in triples and plots each triple's peak,
//! the raster chart draws one column per bucket. They are deliberately not
//! unified.

pub mod console;
pub mod raster;

pub use console::*;
pub use raster::*;
