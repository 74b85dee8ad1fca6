//! Configuration management
//!
//! This module handles loading and managing configuration from
//! TOML files and CLI arguments.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::constants::{files, pool, reporting, timeouts};
use crate::core::error::{Result, SweepError};
use crate::processing::PoolSizing;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the gzip-compressed URL lists
    pub input_dir: Option<String>,

    /// Workers added to the pool for every file in the batch
    pub workers_per_file: Option<usize>,

    /// Pool width for an empty batch, and the floor for any batch
    pub min_pool_width: Option<usize>,

    /// Emit a threshold report every time a file's total hits a multiple of this
    pub report_interval: Option<u64>,

    /// Per-request timeout in seconds (transport default when unset)
    pub timeout: Option<u64>,

    /// Custom User-Agent header
    pub user_agent: Option<String>,

    /// Redirects followed per probe, 0 disables following
    pub max_redirects: Option<usize>,

    /// Enable verbose logging
    pub verbose: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: Some(files::DEFAULT_INPUT_DIR.to_string()),
            workers_per_file: Some(pool::WORKERS_PER_FILE),
            min_pool_width: Some(pool::MIN_POOL_WIDTH),
            report_interval: Some(reporting::REPORT_INTERVAL),
            timeout: None, // Leave the transport's own timeout in place
            user_agent: None,
            max_redirects: Some(timeouts::DEFAULT_MAX_REDIRECTS),
            verbose: Some(false),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SweepError::Config(format!(
                "Could not read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            SweepError::Config(format!(
                "Invalid TOML in config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        // Validate the loaded configuration
        config.validate()?;
        Ok(config)
    }

    /// Try to find and load a config file in standard locations
    pub fn load_from_standard_locations() -> Self {
        for depth in 0..=files::CONFIG_SEARCH_DEPTH {
            let path = format!("{}{}", "../".repeat(depth), files::CONFIG_FILE_NAME);
            if !Path::new(&path).is_file() {
                continue;
            }
            match Self::load_from_file(&path) {
                Ok(config) => {
                    debug!("Loaded configuration from {path}");
                    return config;
                }
                Err(e) => warn!("Ignoring config file {path}: {e}"),
            }
        }

        // Fall back to defaults
        Self::default()
    }

    /// Merge this config with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli_config: &CliConfig) {
        if let Some(ref input_dir) = cli_config.input_dir {
            self.input_dir = Some(input_dir.clone());
        }

        // Pool & reporting
        if let Some(workers_per_file) = cli_config.workers_per_file {
            self.workers_per_file = Some(workers_per_file);
        }
        if let Some(min_pool_width) = cli_config.min_pool_width {
            self.min_pool_width = Some(min_pool_width);
        }
        if let Some(report_interval) = cli_config.report_interval {
            self.report_interval = Some(report_interval);
        }

        // Network
        if let Some(timeout) = cli_config.timeout {
            self.timeout = Some(timeout);
        }
        if let Some(ref user_agent) = cli_config.user_agent {
            self.user_agent = Some(user_agent.clone());
        }
        if let Some(max_redirects) = cli_config.max_redirects {
            self.max_redirects = Some(max_redirects);
        }

        if cli_config.verbose {
            self.verbose = Some(true);
        }
    }

    /// Directory scanned for input files
    pub fn input_dir_path(&self) -> PathBuf {
        PathBuf::from(
            self.input_dir
                .as_deref()
                .unwrap_or(files::DEFAULT_INPUT_DIR),
        )
    }

    /// Pool sizing policy described by this configuration
    pub fn pool_sizing(&self) -> PoolSizing {
        PoolSizing::new(
            self.workers_per_file.unwrap_or(pool::WORKERS_PER_FILE),
            self.min_pool_width.unwrap_or(pool::MIN_POOL_WIDTH),
        )
    }

    pub fn report_interval(&self) -> u64 {
        self.report_interval.unwrap_or(reporting::REPORT_INTERVAL)
    }

    /// Get timeout as Duration, `None` keeps the transport default
    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    pub fn max_redirects(&self) -> usize {
        self.max_redirects
            .unwrap_or(timeouts::DEFAULT_MAX_REDIRECTS)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Some(workers) = self.workers_per_file {
            if workers == 0 {
                return Err(SweepError::Config(
                    "Workers per file cannot be 0. Expected a positive integer.".to_string(),
                ));
            }
            if workers > pool::MAX_WORKERS_PER_FILE {
                return Err(SweepError::Config(format!(
                    "Workers per file of {workers} is extremely high and may exhaust system threads. Expected at most {}.",
                    pool::MAX_WORKERS_PER_FILE
                )));
            }
        }

        if let Some(min_width) = self.min_pool_width
            && min_width < pool::MIN_POOL_WIDTH
        {
            return Err(SweepError::Config(format!(
                "Minimum pool width of {min_width} is too small. Expected at least {}.",
                pool::MIN_POOL_WIDTH
            )));
        }

        if self.report_interval == Some(0) {
            return Err(SweepError::Config(
                "Report interval cannot be 0. Expected a positive number of calls.".to_string(),
            ));
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err(SweepError::Config(
                    "Timeout cannot be 0. Expected a positive integer representing seconds."
                        .to_string(),
                ));
            }
            if timeout > timeouts::MAX_TIMEOUT_SECONDS {
                return Err(SweepError::Config(format!(
                    "Timeout of {timeout} seconds is extremely large (>24 hours). Consider using a smaller value."
                )));
            }
        }

        if let Some(redirects) = self.max_redirects
            && redirects > timeouts::MAX_REDIRECTS_LIMIT
        {
            return Err(SweepError::Config(format!(
                "Redirect limit of {redirects} is too high. Expected at most {}.",
                timeouts::MAX_REDIRECTS_LIMIT
            )));
        }

        Ok(())
    }
}

/// Configuration options that can come from CLI
#[derive(Debug, Default)]
pub struct CliConfig {
    pub input_dir: Option<String>, // [DIR]

    // Pool & reporting
    pub workers_per_file: Option<usize>, // --workers-per-file
    pub min_pool_width: Option<usize>,   // --min-workers
    pub report_interval: Option<u64>,    // --report-interval

    // Network
    pub timeout: Option<u64>,       // --timeout
    pub user_agent: Option<String>, // --user-agent
    pub max_redirects: Option<usize>, // --max-redirects

    // Output
    pub quiet: bool,   // --quiet
    pub verbose: bool, // --verbose

    // Configuration
    pub config_file: Option<String>, // --config
    pub no_config: bool,             // --no-config
}
