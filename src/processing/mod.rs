//! Batch processing pipeline
//!
//! This module streams gzip files line by line, probes each line over HTTP
//! on a shared worker pool, and schedules whole files across that pool.

pub mod line_source;
pub mod pool;
pub mod prober;
pub mod scheduler;

// Re-export commonly used items
pub use line_source::LineSource;
pub use pool::{PoolSizing, WorkerPool};
pub use prober::{HttpProber, Probe, ProbeOutcome};
pub use scheduler::{FileReport, JobStatus, Scheduler};
