// Command-line interface definitions and parsing for urlsweep

use crate::config::CliConfig;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory of gzip-compressed URL lists (default: inputData)
    pub dir: Option<String>,

    // Pool & Reporting
    /// Workers added to the pool per file (default: 8)
    #[arg(long, value_name = "COUNT", help_heading = "Pool & Reporting")]
    pub workers_per_file: Option<usize>,

    /// Pool width for an empty batch and floor for any batch, at least 4 (default: 4)
    #[arg(long, value_name = "COUNT", help_heading = "Pool & Reporting")]
    pub min_workers: Option<usize>,

    /// Emit a progress report every N calls per file (default: 10000)
    #[arg(long, value_name = "CALLS", help_heading = "Pool & Reporting")]
    pub report_interval: Option<u64>,

    // Network
    /// Per-request timeout in seconds (default: transport default)
    #[arg(
        short = 't',
        long,
        value_name = "SECONDS",
        help_heading = "Network"
    )]
    pub timeout: Option<u64>,

    /// Custom User-Agent header
    #[arg(long, value_name = "AGENT", help_heading = "Network")]
    pub user_agent: Option<String>,

    /// Redirects followed per request, 0 disables (default: 10)
    #[arg(long, value_name = "COUNT", help_heading = "Network")]
    pub max_redirects: Option<usize>,

    // Output & Verbosity
    /// Suppress log output
    #[arg(short = 'q', long, help_heading = "Output & Verbosity")]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long, help_heading = "Output & Verbosity")]
    pub verbose: bool,

    // Configuration
    /// Use specific config file
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Ignore config files
    #[arg(long, help_heading = "Configuration")]
    pub no_config: bool,
}

/// Convert parsed arguments into the CLI layer of the configuration
pub fn cli_to_config(cli: &Cli) -> CliConfig {
    CliConfig {
        input_dir: cli.dir.clone(),
        workers_per_file: cli.workers_per_file,
        min_pool_width: cli.min_workers,
        report_interval: cli.report_interval,
        timeout: cli.timeout,
        user_agent: cli.user_agent.clone(),
        max_redirects: cli.max_redirects,
        quiet: cli.quiet,
        verbose: cli.verbose,
        config_file: cli.config.clone(),
        no_config: cli.no_config,
    }
}
