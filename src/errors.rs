//! Error types for DevCenter Fetcher
//!
//! Each concern of the engine (session/authentication, downloads, page
//! scraping, UUID decoding, configuration) has its own error enum. They are
//! wrapped by [`AppError`] at the command level, which is what `main` reports.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Authentication and team-selection errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// No login or password could be resolved from any source
    #[error(
        "Missing portal credentials. Pass --user/--password, set ADC_LOGIN and ADC_PASSWORD, or add an account to the config file"
    )]
    MissingCredentials,

    /// HTTP request failed during authentication
    #[error("HTTP request failed during authentication")]
    Http(#[from] reqwest::Error),

    /// Login form still shown after submitting credentials
    #[error("Portal login failed. The login form was shown again after submitting credentials")]
    LoginFailed,

    /// A team must be chosen but none was configured
    #[error("This account belongs to several teams. Pass --team-id or set ADC_TEAM_ID")]
    TeamRequired,

    /// Configured team is not among the offered options
    #[error("Team '{team_id}' is not offered by the team selection form")]
    TeamNotFound { team_id: String },

    /// Team form still shown after submitting the selection
    #[error("Team selection was not accepted by the portal")]
    TeamSelectionFailed,

    /// Expected form control missing
    #[error("Form '{form}' has no control named '{control}'")]
    MissingFormControl { form: String, control: String },

    /// A stored password is not valid encrypted text
    #[error("Stored password is marked encrypted but is not a valid encrypted value")]
    InvalidEncryptedPassword,

    /// A stored password did not decrypt with the secret key
    #[error("Could not decrypt the stored password. Check --secret-key or ADC_SECRET_KEY")]
    PasswordDecryption,

    /// Encrypting a password failed
    #[error("Failed to encrypt password")]
    PasswordEncryption,

    /// Could not read a password interactively
    #[error("Failed to read password from terminal")]
    Prompt(#[from] std::io::Error),

    /// Page fetch failed while driving the login sequence
    #[error(transparent)]
    Download(#[from] DownloadError),
}

/// HTTP session and artifact download errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP request error
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// I/O error during file operations
    #[error("File I/O error")]
    Io(#[from] std::io::Error),

    /// Invalid URL provided
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Server returned error status
    #[error("Server error: HTTP {status} for {url}")]
    ServerError { status: u16, url: String },

    /// Atomic file operation failed
    #[error("Atomic file operation failed: could not rename {temp_path} to {final_path}")]
    AtomicOperationFailed {
        temp_path: PathBuf,
        final_path: PathBuf,
    },

    /// Renaming a downloaded profile to its final name failed
    #[error("Could not rename {from} to {to}")]
    RenameFailed { from: PathBuf, to: PathBuf },
}

/// Page scraping errors
///
/// Rows that do not match the expected layout are skipped, not reported; the
/// only hard failure is a selector that cannot be compiled.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// CSS selector error
    #[error("Invalid CSS selector: {selector}")]
    InvalidSelector { selector: String },
}

/// Provisioning profile UUID decoding errors
#[derive(Error, Debug)]
pub enum ResolverError {
    /// The decoder program could not be started
    #[error("Failed to run profile decoder '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The decoder exited unsuccessfully
    #[error("Profile decoder exited with {status}: {stderr}")]
    DecoderFailed { status: ExitStatus, stderr: String },

    /// The decoder produced something that is not a UUID
    #[error("Profile decoder returned invalid UUID output for {path}: '{output}'")]
    InvalidOutput { path: PathBuf, output: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Configuration file could not be read or written
    #[error("Configuration file I/O error: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// No standard config location could be determined
    #[error("Could not determine user config directory")]
    NoConfigDir,
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Authentication error
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Download error
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Scraping error
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    /// UUID decoding error
    #[error(transparent)]
    Resolver(#[from] ResolverError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// JSON dump serialization error
    #[error("Failed to serialize site data")]
    Json(#[from] serde_json::Error),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error was transient (network level)
    ///
    /// Nothing is retried; this only informs the final error message.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Download(DownloadError::Http(_))
                | AppError::Auth(AuthError::Http(_))
                | AppError::Auth(AuthError::Download(DownloadError::Http(_)))
        )
    }

    /// Text printed to the terminal when a command fails
    pub fn report(&self) -> String {
        let mut message = format!("Error ({}): {}", self.category(), self);
        if self.is_recoverable() {
            message.push_str("\nThe portal could not be reached; running the command again may succeed.");
        }
        message
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Auth(_) => "authentication",
            AppError::Download(_) => "download",
            AppError::Scrape(_) => "scraping",
            AppError::Resolver(_) => "decoder",
            AppError::Config(_) => "config",
            AppError::Json(_) => "output",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Authentication result type alias
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Download result type alias
pub type DownloadResult<T> = std::result::Result<T, DownloadError>;

/// Scraping result type alias
pub type ScrapeResult<T> = std::result::Result<T, ScrapeError>;

/// Resolver result type alias
pub type ResolverResult<T> = std::result::Result<T, ResolverError>;

/// Config result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(AppError::from(AuthError::LoginFailed).category(), "authentication");
        assert_eq!(
            AppError::from(ScrapeError::InvalidSelector {
                selector: "td[".to_string()
            })
            .category(),
            "scraping"
        );
        assert_eq!(AppError::generic("boom").category(), "generic");
    }

    #[test]
    fn test_login_failure_not_recoverable() {
        assert!(!AppError::from(AuthError::LoginFailed).is_recoverable());
        assert!(!AppError::from(AuthError::TeamRequired).is_recoverable());
    }

    #[test]
    fn test_report_names_category() {
        let report = AppError::from(AuthError::TeamRequired).report();
        assert!(report.starts_with("Error (authentication): "));
        assert!(report.contains("--team-id"));
        assert!(!report.contains("running the command again"));
    }

    #[test]
    fn test_team_not_found_message() {
        let err = AuthError::TeamNotFound {
            team_id: "ABCDE12345".to_string(),
        };
        assert!(err.to_string().contains("ABCDE12345"));
    }
}
