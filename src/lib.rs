//! Brightness histograms for raster images, rendered as console bar charts
//! or as an HTML page of inline PNG plots served over HTTP.

pub mod console;
pub mod discovery;
pub mod encode;
pub mod errors;
pub mod image_loader;
pub mod logging;
pub mod page;
pub mod plot;
pub mod server;
pub mod settings;
pub mod task_scheduler;

#[cfg(test)]
mod tests;

pub use encode::EncodedArtifact;
pub use errors::{HistError, Result};
pub use image_loader::{Histogram, ImageLocation};
pub use settings::Config;
pub use task_scheduler::{Batch, CancelToken, ImageJob, JobOutcome};
