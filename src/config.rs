//! Configuration management for DevCenter Fetcher
//!
//! Settings come from an optional TOML file. Everything has a working
//! default, so the file is only needed for stored accounts or to point the
//! fetcher at different portal URLs or a different profile decoder.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::app::client::{ClientConfig, ProxyConfig};
use crate::app::{ProfileNaming, SiteUrls};
use crate::constants::{decoder, files, http, portal};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Login of the account used when none is given on the command line
    pub default_account: Option<String>,
    /// Stored portal accounts
    pub accounts: Vec<AccountConfig>,
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Portal page locations
    pub portal: PortalConfigToml,
    /// External profile decoder
    pub decoder: DecoderConfig,
    /// Download settings
    pub output: OutputConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// A stored portal account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub login: String,
    /// Plaintext, or an `enc:` value decrypted with the secret key
    pub password: Option<String>,
    pub team_id: Option<String>,
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Connect timeout
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// User agent override
    pub user_agent: Option<String>,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            user_agent: None,
        }
    }
}

/// TOML-friendly portal URL configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfigToml {
    pub development_profiles: String,
    pub distribution_profiles: String,
    pub development_certificates: String,
    pub distribution_certificates: String,
    pub devices: String,
    pub root_certificate: String,
}

impl Default for PortalConfigToml {
    fn default() -> Self {
        Self {
            development_profiles: portal::DEVELOPMENT_PROFILES_URL.to_string(),
            distribution_profiles: portal::DISTRIBUTION_PROFILES_URL.to_string(),
            development_certificates: portal::DEVELOPMENT_CERTIFICATES_URL.to_string(),
            distribution_certificates: portal::DISTRIBUTION_CERTIFICATES_URL.to_string(),
            devices: portal::DEVICES_URL.to_string(),
            root_certificate: portal::ROOT_CERTIFICATE_URL.to_string(),
        }
    }
}

/// External profile decoder invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Program to run
    pub program: String,
    /// Arguments; `{profile}` and `{anchor}` are substituted
    pub args: Vec<String>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            program: decoder::DEFAULT_PROGRAM.to_string(),
            args: vec![
                decoder::PROFILE_PLACEHOLDER.to_string(),
                "-c".to_string(),
                decoder::ANCHOR_PLACEHOLDER.to_string(),
                "-d".to_string(),
                decoder::UUID_FIELD.to_string(),
            ],
        }
    }
}

/// Download settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving profiles, certificates and the trust anchor
    pub download_dir: PathBuf,
    /// Basename used for saved profiles
    pub profile_naming: ProfileNaming,
    /// Show a progress bar while artifacts download
    pub progress_bar: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("."),
            profile_naming: ProfileNaming::Uuid,
            progress_bar: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level for the application
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `config_file_override`, else from the first
    /// standard location that exists, else defaults
    ///
    /// # Errors
    ///
    /// An explicitly given file that does not exist, or any file that fails to
    /// read or parse.
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path });
                }
                Some(path)
            }
            None => Self::find_config_file(),
        };

        match config_path {
            Some(path) => Self::load_from_file(&path).await,
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(format!("./{}", files::LOCAL_CONFIG_FILE))];
        if let Ok(path) = Self::default_config_path() {
            search_paths.push(path);
        }

        search_paths.into_iter().find(|path| {
            let found = path.exists();
            if found {
                debug!("Found config file: {}", path.display());
            }
            found
        })
    }

    /// Get the default config file path for the current user
    pub fn default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join(files::CONFIG_DIR_NAME).join("config.toml"))
    }

    /// Load configuration from a TOML file
    pub async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::parse(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Parse configuration text
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.portal.to_site_urls()?;
        Ok(config)
    }

    /// Write the commented default configuration to `path`
    ///
    /// Refuses to replace an existing file unless `force` is set.
    pub async fn write_default(path: &Path, force: bool) -> ConfigResult<()> {
        if path.exists() && !force {
            return Err(ConfigError::InvalidValue {
                field: "path".to_string(),
                value: path.display().to_string(),
                reason: "File already exists; use --force to overwrite".to_string(),
            });
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|source| ConfigError::Io {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }
        }
        tokio::fs::write(path, Self::generate_default_config_content())
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        info!("Wrote default configuration to {}", path.display());
        Ok(())
    }

    /// Find a stored account by login, or the default account
    pub fn account(&self, login: Option<&str>) -> Option<&AccountConfig> {
        let wanted = login.or(self.default_account.as_deref());
        match wanted {
            Some(login) => self.accounts.iter().find(|a| a.login == login),
            None if self.accounts.len() == 1 => self.accounts.first(),
            None => None,
        }
    }

    /// Runtime HTTP client settings; the proxy always comes from the environment
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            request_timeout: self.client.request_timeout,
            connect_timeout: self.client.connect_timeout,
            user_agent: self
                .client
                .user_agent
                .clone()
                .unwrap_or_else(|| http::USER_AGENT.to_string()),
            proxy: ProxyConfig::from_env(),
        }
    }

    /// Generate default configuration content with helpful comments
    pub fn generate_default_config_content() -> String {
        format!(
            r#"# DevCenter Fetcher Configuration
# Every setting is optional; the values below are the defaults.

# Login of the account to use when --user is not given
# default_account = "jane@example.com"

# Stored accounts. Passwords may be left out and entered at the prompt.
# Output of `devcenter_fetcher config encrypt` can be stored instead of the
# plain password; pass the same key with --secret-key or ADC_SECRET_KEY.
# [[accounts]]
# login = "jane@example.com"
# password = "enc:..."
# team_id = "ABCDE12345"

[client]
request_timeout = "{}s"
connect_timeout = "{}s"
# user_agent = "..."

[portal]
development_profiles = "{}"
distribution_profiles = "{}"
development_certificates = "{}"
distribution_certificates = "{}"
devices = "{}"
root_certificate = "{}"

[decoder]
# Invoked once per profile; prints the profile UUID on stdout
program = "{}"
args = ["{{profile}}", "-c", "{{anchor}}", "-d", "UUID"]

[output]
download_dir = "."
profile_naming = "uuid"  # uuid or name
progress_bar = true

[logging]
level = "info"  # error, warn, info, debug, trace
"#,
            http::DEFAULT_TIMEOUT.as_secs(),
            http::CONNECT_TIMEOUT.as_secs(),
            portal::DEVELOPMENT_PROFILES_URL,
            portal::DISTRIBUTION_PROFILES_URL,
            portal::DEVELOPMENT_CERTIFICATES_URL,
            portal::DISTRIBUTION_CERTIFICATES_URL,
            portal::DEVICES_URL,
            portal::ROOT_CERTIFICATE_URL,
            decoder::DEFAULT_PROGRAM,
        )
    }
}

impl PortalConfigToml {
    /// Convert to validated runtime URLs
    pub fn to_site_urls(&self) -> ConfigResult<SiteUrls> {
        Ok(SiteUrls {
            development_profiles: parse_url("portal.development_profiles", &self.development_profiles)?,
            distribution_profiles: parse_url("portal.distribution_profiles", &self.distribution_profiles)?,
            development_certificates: parse_url(
                "portal.development_certificates",
                &self.development_certificates,
            )?,
            distribution_certificates: parse_url(
                "portal.distribution_certificates",
                &self.distribution_certificates,
            )?,
            devices: parse_url("portal.devices", &self.devices)?,
            root_certificate: parse_url("portal.root_certificate", &self.root_certificate)?,
        })
    }
}

fn parse_url(field: &str, value: &str) -> ConfigResult<Url> {
    Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}
