use clap::Parser;
use urlsweep::config::{CliConfig, Config};
use urlsweep::core::constants::messages;
use urlsweep::reporting::StdoutSink;
use urlsweep::reporting::logging;
use urlsweep::ui::{Cli, cli_to_config};

fn main() {
    let cli = Cli::parse();

    match run_urlsweep_logic(&cli) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Main batch logic extracted from main() for testing
pub fn run_urlsweep_logic(cli: &Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let cli_config = cli_to_config(cli);

    // Load and merge configuration
    let config = load_and_merge_config(&cli_config)?;

    let verbose = config.verbose.unwrap_or(false);
    logging::init_logger(verbose, cli_config.quiet);

    println!("{}", messages::STARTUP);
    urlsweep::run_batch(&config, StdoutSink)?;
    println!("{}", messages::BATCH_COMPLETE);

    Ok(0)
}

/// Load configuration from file or standard locations and merge with CLI config
pub fn load_and_merge_config(cli_config: &CliConfig) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if cli_config.no_config {
        Config::default()
    } else if let Some(ref config_file) = cli_config.config_file {
        Config::load_from_file(config_file)?
    } else {
        Config::load_from_standard_locations()
    };

    // Merge CLI arguments with configuration (CLI takes precedence)
    config.merge_with_cli(cli_config);
    config.validate()?;
    Ok(config)
}
