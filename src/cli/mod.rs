//! Command-line interface components
//!
//! This module contains CLI-specific code for the DevCenter Fetcher
//! application: argument parsing and the command handlers.

pub mod args;
pub mod commands;

pub use args::{
    AccountArgs, AuthAction, AuthArgs, Cli, Commands, ConfigAction, ConfigArgs, FetchArgs,
    GlobalArgs,
};
pub use commands::{handle_auth, handle_config, handle_fetch};
