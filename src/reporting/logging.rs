use crate::config::Config;
use crate::core::error::SweepError;
use log::{debug, error, info, warn};
use std::path::Path;
use std::time::Duration;

/// Initialize the logger with appropriate level based on verbosity
///
/// `RUST_LOG`, when set, replaces the verbosity default unless `quiet` is on.
/// Later calls keep the logger installed first.
pub fn init_logger(verbose: bool, quiet: bool) {
    let env_filters = std::env::var(env_logger::DEFAULT_FILTER_ENV).ok();
    let mut builder = logger_builder(verbose, quiet, env_filters.as_deref());

    if builder.try_init().is_ok() {
        debug!("Logger initialized with level: {:?}", log::max_level());
    }
}

fn default_level(verbose: bool, quiet: bool) -> log::LevelFilter {
    if quiet {
        log::LevelFilter::Off
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn // Reports go to stdout, logs only carry problems
    }
}

fn logger_builder(verbose: bool, quiet: bool, env_filters: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(default_level(verbose, quiet))
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);

    if let Some(filters) = env_filters.filter(|_| !quiet) {
        builder.parse_filters(filters);
    }
    builder
}

/// Log configuration information
pub fn log_config_info(config: &Config, pool_width: usize) {
    let timeout = config
        .timeout
        .map(|t| format!("{t}s"))
        .unwrap_or_else(|| "transport default".to_string());
    let report_interval = config.report_interval();
    let max_redirects = config.max_redirects();

    info!("Configuration: pool_width={pool_width}, report_interval={report_interval}");
    info!("HTTP: timeout={timeout}, max_redirects={max_redirects}");
}

/// Log the files that make up a batch
pub fn log_batch_info<P: AsRef<Path>>(files: &[P]) {
    info!("Processing {} file(s)", files.len());
    for (i, file) in files.iter().enumerate() {
        debug!("  {}. {}", i + 1, file.as_ref().display());
    }
}

/// Log a directory that could not be listed
pub fn log_discovery_failure(err: &SweepError) {
    warn!("{err}, treating it as empty");
}

/// Log a file job that stopped early
pub fn log_file_failure(err: &SweepError) {
    match std::error::Error::source(err) {
        Some(cause) => error!("{err} ({cause:?})"),
        None => error!("{err}"),
    }
}

/// Log the end of a file job
pub fn log_file_complete(file_name: &str, total: u64, elapsed: Duration) {
    debug!(
        "Finished {file_name}: {total} calls in {}ms",
        elapsed.as_millis()
    );
}

/// Log individual probe results for debugging
pub fn log_probe_result(line: &str, result: Result<u16, &SweepError>) {
    let line = line.trim();
    match result {
        Ok(status) if status == crate::core::constants::http_status::OK => {
            debug!("✓ {line} -> {status}")
        }
        Ok(status) => debug!("✗ {line} -> {status}"),
        Err(err) => debug!("✗ {line} -> {err}"),
    }
}

/// Log batch completion
pub fn log_batch_complete(file_count: usize, aborted: usize, duration: Duration) {
    if aborted == 0 {
        info!(
            "Batch complete: {file_count} file(s) in {}ms",
            duration.as_millis()
        );
    } else {
        warn!(
            "Batch complete: {file_count} file(s), {aborted} aborted ({}ms)",
            duration.as_millis()
        );
    }
}
