use crate::encode::{self, EncodedArtifact};
use crate::errors::{HistError, Result};
use crate::image_loader::{self, Histogram, ImageLocation};
use crate::plot;
use crate::settings::BatchConfig;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// One image to push through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageJob {
    /// Position in the discovery order.
    pub index: usize,
    pub id: String,
    pub location: ImageLocation,
}

impl ImageJob {
    pub fn new(index: usize, id: impl Into<String>) -> Self {
        let id = id.into();
        let location = ImageLocation::parse(&id);
        Self { index, id, location }
    }
}

/// Result of a single job. Failures stay local to their row.
#[derive(Debug)]
pub struct JobOutcome {
    pub source: String,
    pub result: Result<EncodedArtifact>,
}

/// Shared cancellation flag for a running batch.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Cancels the token when dropped.
    pub fn guard(&self) -> CancelGuard {
        CancelGuard {
            token: self.clone(),
        }
    }
}

pub struct CancelGuard {
    token: CancelToken,
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Decode, histogram, rasterize and encode a single image.
pub fn process_one(job: &ImageJob, config: &BatchConfig) -> Result<EncodedArtifact> {
    let _span = tracing::debug_span!("image", index = job.index, id = %job.id).entered();
    let started = Instant::now();

    let image = image_loader::load(&job.location, &config.source)?;
    let decoded = started.elapsed();

    let histogram = Histogram::from_image(&image);
    drop(image);

    let canvas = plot::render_raster(&histogram, &config.plot);
    let data_uri = encode::to_data_uri(&canvas)?;

    log::debug!(
        "{}: decode {:?}, total {:?}, {} pixels",
        job.id,
        decoded,
        started.elapsed(),
        histogram.total()
    );

    Ok(EncodedArtifact {
        source: job.id.clone(),
        data_uri,
    })
}

/// Runs image jobs on a bounded worker pool.
pub struct Batch {
    pool: ThreadPool,
    config: BatchConfig,
}

impl Batch {
    pub fn new(config: BatchConfig) -> Result<Self> {
        let num_threads = config.worker_count();
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("histogram-worker-{}", i))
            .build()
            .map_err(|e| HistError::ThreadPool {
                message: e.to_string(),
            })?;

        log::info!("Batch pool ready with {} workers", num_threads);
        Ok(Self { pool, config })
    }

    /// Process every id in parallel. Outcomes come back in input order,
    /// whatever order the workers finish in.
    pub fn run(&self, ids: &[String], cancel: &CancelToken) -> Vec<JobOutcome> {
        let jobs: Vec<ImageJob> = ids
            .iter()
            .enumerate()
            .map(|(index, id)| ImageJob::new(index, id.as_str()))
            .collect();

        log::info!("Processing {} images", jobs.len());
        // Indexed collect: each outcome lands in its job's slot.
        self.pool.install(|| {
            jobs.par_iter()
                .map(|job| self.run_job(job, cancel))
                .collect()
        })
    }

    fn run_job(&self, job: &ImageJob, cancel: &CancelToken) -> JobOutcome {
        let result = if cancel.is_cancelled() {
            Err(HistError::Cancelled)
        } else {
            process_one(job, &self.config)
        };

        if let Err(e) = &result {
            log::warn!("[{}] {} (job {}): {}", e.error_code(), job.id, job.index, e);
        }

        JobOutcome {
            source: job.id.clone(),
            result,
        }
    }
}
