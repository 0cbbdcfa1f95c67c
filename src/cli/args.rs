//! Command-line argument parsing for DevCenter Fetcher
//!
//! This module defines the CLI structure using clap derive macros,
//! providing commands for fetching portal content, checking credentials and
//! managing the configuration file.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::ProfileNaming;
use crate::auth::CredentialOverrides;
use crate::constants::files;

/// DevCenter Fetcher - Download iOS certificates and provisioning profiles
#[derive(Parser, Debug)]
#[command(
    name = "devcenter_fetcher",
    version,
    about = "Download certificates and provisioning profiles from Apple's iOS developer portal",
    long_about = "Logs in to Apple's iOS developer portal, lists the registered devices, provisioning
profiles and signing certificates of an account, and downloads every profile and certificate."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (trace level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - only report errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log HTTP requests and responses to FILE [default: devcenter_fetcher.log]
    #[arg(
        short = 'l',
        long,
        global = true,
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = files::DEFAULT_LOG_FILE
    )]
    pub logfile: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download devices, profiles and certificates
    Fetch(FetchArgs),

    /// Check portal credentials
    Auth(AuthArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Portal account options shared by commands that log in
#[derive(Args, Debug, Clone, Default)]
pub struct AccountArgs {
    /// Portal login (Apple ID)
    #[arg(short, long, value_name = "APPLEID")]
    pub user: Option<String>,

    /// Portal password
    #[arg(short, long)]
    pub password: Option<String>,

    /// Team ID for accounts in several developer programs
    #[arg(short, long, value_name = "TEAMID")]
    pub team_id: Option<String>,

    /// Secret key for an encrypted password in the config file
    #[arg(short, long, value_name = "SECRETKEY")]
    pub secret_key: Option<String>,
}

impl AccountArgs {
    pub fn overrides(&self) -> CredentialOverrides {
        CredentialOverrides {
            login: self.user.clone(),
            password: self.password.clone(),
            team_id: self.team_id.clone(),
            secret_key: self.secret_key.clone(),
        }
    }
}

/// Arguments for the fetch command
#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    #[command(flatten)]
    pub account: AccountArgs,

    /// Use the profile's name instead of its UUID as the file's basename
    #[arg(short, long)]
    pub name: bool,

    /// Save the portal content to DIR (created if missing)
    #[arg(short, long, value_name = "DIR")]
    pub download_dir: Option<PathBuf>,

    /// Dump the portal content as JSON to FILE, or to standard output
    #[arg(short, long, value_name = "FILE", num_args = 0..=1)]
    pub json: Option<Option<PathBuf>>,

    /// Do not show a progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl FetchArgs {
    /// Profile naming from flags, falling back to the configured naming
    pub fn profile_naming(&self, configured: ProfileNaming) -> ProfileNaming {
        if self.name {
            ProfileNaming::Name
        } else {
            configured
        }
    }
}

/// Arguments for authentication checks
#[derive(Args, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub action: AuthAction,
}

/// Authentication actions
#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Show where credentials would come from
    Status,

    /// Log in and open the device list
    Verify(AccountArgs),
}

/// Arguments for configuration management
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a commented default configuration file
    Init {
        /// Destination; defaults to the user config directory
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,

    /// Encrypt a password for an account entry
    Encrypt {
        /// Secret key to encrypt with (defaults to ADC_SECRET_KEY)
        #[arg(short, long, value_name = "SECRETKEY")]
        secret_key: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level requested by flags, if any
    pub fn log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::TRACE)
        } else if self.global.verbose {
            Some(tracing::Level::DEBUG)
        } else {
            None
        }
    }
}
