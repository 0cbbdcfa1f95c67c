//! Credential management for the developer portal
//!
//! This module resolves the account used for a run from command-line flags,
//! environment variables and the config file, decrypts stored passwords, and
//! reports where credentials would come from.
//!
//! # Examples
//!
//! ```rust,no_run
//! use devcenter_fetcher::auth::{resolve_credentials, CredentialOverrides};
//! use devcenter_fetcher::config::AppConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let credentials = resolve_credentials(&CredentialOverrides::default(), &config)?;
//! println!("Using Apple ID {}", credentials.login);
//! # Ok(())
//! # }
//! ```

pub mod credentials;
pub mod secret;

// Re-export main public API
pub use credentials::{
    get_auth_status, lookup_credentials, prompt_password, resolve_credentials, secret_key,
    show_auth_status, AuthStatus, CredentialOverrides, Credentials,
};
pub use secret::{decrypt_password, encrypt_password};
