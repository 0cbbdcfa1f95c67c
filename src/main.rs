//! DevCenter Fetcher CLI application
//!
//! Command-line interface for downloading certificates, provisioning profiles
//! and the device list from Apple's iOS developer portal.

use std::fs::OpenOptions;
use std::process;
use std::sync::Mutex;

use tracing::{debug, info};
use tracing_subscriber::filter::{filter_fn, Directive};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

// Import CLI modules through the library (module is public but not re-exported)
use devcenter_fetcher::cli::{handle_auth, handle_config, handle_fetch, Cli, Commands};
use devcenter_fetcher::config::AppConfig;
use devcenter_fetcher::constants::http;
use devcenter_fetcher::errors::{AppError, Result};

#[tokio::main]
async fn main() {
    // Initialize program
    let result = run().await;

    // Handle any errors that occurred
    if let Err(e) = result {
        eprintln!("{}", e.report());
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok(); // Ignore errors if file doesn't exist

    // Parse command line arguments
    let cli = Cli::parse_args();

    // Configuration errors are reported after logging is up
    let config = AppConfig::load(cli.global.config.clone()).await;
    let default_level = config
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_logging(&cli, &default_level)?;

    debug!("DevCenter Fetcher v{} starting", env!("CARGO_PKG_VERSION"));

    // Execute the appropriate command
    match cli.command {
        Commands::Fetch(args) => {
            debug!("Executing fetch command");
            handle_fetch(args, config?).await
        }
        Commands::Auth(args) => {
            debug!("Executing auth command");
            handle_auth(args, config?).await
        }
        Commands::Config(args) => {
            debug!("Executing config command");
            handle_config(args, cli.global.config).await
        }
    }
}

/// Initialize logging based on CLI verbosity settings
///
/// Console output goes to stderr so a JSON dump on stdout stays clean. With
/// `--logfile`, request/response traffic is additionally appended to that file.
fn init_logging(cli: &Cli, default_level: &str) -> Result<()> {
    let log_level = cli
        .log_level()
        .map(|level| level.to_string().to_lowercase())
        .unwrap_or_else(|| default_level.to_string());

    // Create environment filter
    let directive = format!("devcenter_fetcher={}", log_level)
        .parse::<Directive>()
        .map_err(|e| AppError::generic(format!("Invalid log level '{}': {}", log_level, e)))?;
    let filter = EnvFilter::from_default_env().add_directive(directive);

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(cli.global.very_verbose) // Show levels only in very verbose mode
        .with_filter(filter);

    let traffic = match &cli.global.logfile {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_filter(filter_fn(|metadata| {
                        metadata.target() == http::TRAFFIC_TARGET
                    })),
            )
        }
        None => None,
    };

    // Initialize subscriber
    tracing_subscriber::registry()
        .with(console)
        .with(traffic)
        .init();

    if cli.global.very_verbose {
        debug!("Very verbose logging enabled");
    } else if cli.global.verbose {
        debug!("Verbose logging enabled");
    }
    if let Some(path) = &cli.global.logfile {
        info!("Logging HTTP traffic to {}", path.display());
    }
    Ok(())
}
