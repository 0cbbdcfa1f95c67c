//! DevCenter Fetcher Library
//!
//! A Rust library for downloading provisioning profiles, signing certificates
//! and the device list of an account on Apple's iOS developer portal. The
//! portal offers no API, so the library drives it like a browser: it logs in,
//! selects a team, scrapes the listing pages and saves the linked artifacts.

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
