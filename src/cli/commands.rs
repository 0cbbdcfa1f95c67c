//! Command handlers for DevCenter Fetcher CLI
//!
//! This module implements the command handlers that turn CLI arguments and
//! the loaded configuration into calls on the core application.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, warn};

use crate::app::{
    Authenticator, CommandUuidResolver, DeviceExtractor, FetchConfig, PageExtractor,
    PortalClient, SiteData, SiteFetcher,
};
use crate::auth::{
    encrypt_password, resolve_credentials, secret_key, show_auth_status, CredentialOverrides,
};
use crate::cli::{AccountArgs, AuthAction, AuthArgs, ConfigAction, ConfigArgs, FetchArgs};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Handle the fetch command
///
/// Logs in, reads every listing, downloads every artifact into the download
/// directory and optionally dumps the collected records as JSON.
pub async fn handle_fetch(args: FetchArgs, config: AppConfig) -> Result<()> {
    let start_time = Instant::now();

    let credentials = resolve_credentials(&args.account.overrides(), &config)?;
    let download_dir = args
        .download_dir
        .clone()
        .unwrap_or_else(|| config.output.download_dir.clone());
    info!(
        "Downloading portal certificates and profiles for Apple ID '{}' to directory '{}'",
        credentials.login,
        download_dir.display()
    );

    let client = PortalClient::with_config(&config.client_config())?;
    let authenticator = Authenticator::new(client, credentials);
    let fetch_config = FetchConfig::default()
        .with_download_dir(download_dir)
        .with_profile_naming(args.profile_naming(config.output.profile_naming))
        .with_progress_bar(config.output.progress_bar && !args.no_progress);

    let mut fetcher = SiteFetcher::new(
        authenticator,
        config.portal.to_site_urls()?,
        fetch_config,
        Box::new(CommandUuidResolver::from_config(&config.decoder)),
    );
    let site = fetcher.fetch_site_data().await?;

    info!(
        "Saved {} profiles and {} certificates ({} devices listed) in {:?}",
        site.profiles.len(),
        site.certificates.len(),
        site.devices.len(),
        start_time.elapsed()
    );

    if let Some(destination) = &args.json {
        write_json(&site, destination.as_deref()).await?;
    }
    Ok(())
}

/// Write the JSON dump to `destination`, or to standard output
async fn write_json(site: &SiteData, destination: Option<&Path>) -> Result<()> {
    let text = site.to_json()?;
    match destination {
        Some(path) => {
            tokio::fs::write(path, text).await?;
            info!("Wrote JSON dump to {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

/// Handle authentication commands
pub async fn handle_auth(args: AuthArgs, config: AppConfig) -> Result<()> {
    match args.action {
        AuthAction::Status => {
            show_auth_status(&config);
            Ok(())
        }
        AuthAction::Verify(account) => verify_account(&account, &config).await,
    }
}

/// Log in and read the device page
async fn verify_account(account: &AccountArgs, config: &AppConfig) -> Result<()> {
    let overrides: CredentialOverrides = account.overrides();
    let credentials = resolve_credentials(&overrides, config)?;
    let login = credentials.login.clone();

    let client = PortalClient::with_config(&config.client_config())?;
    let mut authenticator = Authenticator::new(client, credentials);
    let urls = config.portal.to_site_urls()?;

    let page = authenticator.ensure_ready(&urls.devices).await?;
    let devices = DeviceExtractor::new()?.extract(&page).records;
    println!(
        "✅ Logged in as '{}' ({} devices registered)",
        login,
        devices.len()
    );
    Ok(())
}

/// Handle configuration commands
///
/// `config_override` is the global `--config` path.
pub async fn handle_config(args: ConfigArgs, config_override: Option<PathBuf>) -> Result<()> {
    match args.action {
        ConfigAction::Init { path, force } => {
            let path = match path.or(config_override) {
                Some(path) => path,
                None => AppConfig::default_config_path()?,
            };
            AppConfig::write_default(&path, force).await?;
            println!("Wrote default configuration to {}", path.display());
            Ok(())
        }
        ConfigAction::Show => {
            let config = AppConfig::load(config_override).await?;
            let text = toml::to_string_pretty(&redacted(config))
                .map_err(|e| AppError::generic(format!("Failed to render configuration: {}", e)))?;
            println!("{}", text);
            Ok(())
        }
        ConfigAction::Encrypt { secret_key: explicit } => {
            let key = secret_key(explicit.as_deref());
            if key.is_empty() {
                warn!("No secret key given; encrypting with the empty key");
            }
            let password = rpassword::prompt_password("Password to encrypt: ")?;
            if password.is_empty() {
                return Err(AppError::generic("Refusing to encrypt an empty password"));
            }
            println!("{}", encrypt_password(&password, &key)?);
            Ok(())
        }
    }
}

/// Hide stored passwords
fn redacted(mut config: AppConfig) -> AppConfig {
    for account in &mut config.accounts {
        if account.password.is_some() {
            account.password = Some("<redacted>".to_string());
        }
    }
    config
}
