//! Bulk reachability checks for URL lists stored in gzip files.
//!
//! A batch lists a directory, sizes one worker pool for all of its files,
//! streams every file line by line, probes each line with an HTTP GET and
//! reports per-file success and failure counts.

pub mod config;
pub mod core;
pub mod discovery;
pub mod processing;
pub mod reporting;
pub mod ui;

// Re-export commonly used items
pub use crate::core::{Result, SweepError};
pub use config::Config;
pub use discovery::{DirectoryListing, FileDiscovery};
pub use processing::{FileReport, HttpProber, JobStatus, PoolSizing, ProbeOutcome, Scheduler};
pub use reporting::{ReportSink, StatsSnapshot};

/// Discover the files of `config`'s input directory and process them all.
pub fn run_batch<S: ReportSink>(config: &Config, sink: S) -> Result<Vec<FileReport>> {
    let files = DirectoryListing::new(config.input_dir_path()).discover();
    reporting::logging::log_batch_info(&files);

    let prober = HttpProber::new(config)?;
    let scheduler = Scheduler::from_config(config, files.len(), prober, sink)?;
    reporting::logging::log_config_info(config, scheduler.pool_width());

    Ok(scheduler.process(&files))
}
