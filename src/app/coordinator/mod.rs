//! Fetch orchestration
//!
//! [`SiteFetcher`] visits the portal pages in a fixed order, extracts the
//! records of each page, then downloads every artifact. Everything runs
//! sequentially on one session; the first failure ends the run.
//!
//! # Architecture
//!
//! - [`config`] - Portal URLs and output settings
//! - [`progress`] - Progress display while artifacts download
//!
//! # Examples
//!
//! ```rust,no_run
//! use devcenter_fetcher::app::{
//!     Authenticator, CommandUuidResolver, FetchConfig, PortalClient, SiteFetcher,
//! };
//! use devcenter_fetcher::auth::{resolve_credentials, CredentialOverrides};
//! use devcenter_fetcher::config::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let credentials = resolve_credentials(&CredentialOverrides::default(), &config)?;
//! let authenticator = Authenticator::new(PortalClient::new()?, credentials);
//!
//! let mut fetcher = SiteFetcher::new(
//!     authenticator,
//!     config.portal.to_site_urls()?,
//!     FetchConfig::default().with_download_dir("profiles"),
//!     Box::new(CommandUuidResolver::from_config(&config.decoder)),
//! );
//! let site = fetcher.fetch_site_data().await?;
//! println!("{} profiles", site.profiles.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod progress;

use tracing::info;

use crate::app::artifacts::ArtifactDownloader;
use crate::app::client::Authenticator;
use crate::app::extract::{
    CertificateExtractor, CertificateLayout, DeviceExtractor, PageExtractor, ProfileExtractor,
};
use crate::app::models::{Certificate, Device, Profile, SigningKind, SiteData};
use crate::app::resolver::UuidResolver;
use crate::errors::Result;

pub use config::{FetchConfig, SiteUrls};
pub use progress::ArtifactProgress;

/// Reads everything the portal lists for one account and downloads it
pub struct SiteFetcher {
    authenticator: Authenticator,
    urls: SiteUrls,
    config: FetchConfig,
    resolver: Box<dyn UuidResolver>,
}

impl SiteFetcher {
    pub fn new(
        authenticator: Authenticator,
        urls: SiteUrls,
        config: FetchConfig,
        resolver: Box<dyn UuidResolver>,
    ) -> Self {
        Self {
            authenticator,
            urls,
            config,
            resolver,
        }
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Read the registered devices
    pub async fn read_devices(&mut self) -> Result<Vec<Device>> {
        info!("Fetching devices");
        let page = self.authenticator.ensure_ready(&self.urls.devices).await?;
        let extraction = DeviceExtractor::new()?.extract(&page);
        Ok(extraction.records)
    }

    /// Read the profiles of one kind
    pub async fn read_profiles(&mut self, kind: SigningKind) -> Result<Vec<Profile>> {
        info!("Fetching {} profiles", kind);
        let url = self.urls.profiles(kind).clone();
        let page = self.authenticator.ensure_ready(&url).await?;
        let extraction = ProfileExtractor::new(kind)?.extract(&page);
        Ok(extraction.records)
    }

    /// Development profiles followed by distribution profiles
    pub async fn read_all_profiles(&mut self) -> Result<Vec<Profile>> {
        let mut profiles = Vec::new();
        for kind in SigningKind::ALL {
            profiles.extend(self.read_profiles(kind).await?);
        }
        Ok(profiles)
    }

    /// Read the certificates of one layout, logging informational rows
    pub async fn read_certificates(&mut self, layout: CertificateLayout) -> Result<Vec<Certificate>> {
        let kind = layout.kind();
        info!("Fetching {} certificates", kind);
        let url = self.urls.certificates(kind).clone();
        let page = self.authenticator.ensure_ready(&url).await?;
        let extraction = CertificateExtractor::new(layout)?.extract(&page);
        for note in &extraction.notes {
            info!("Portal notice on {} certificates: {}", kind, note);
        }
        Ok(extraction.records)
    }

    /// Development certificates followed by distribution certificates
    pub async fn read_all_certificates(&mut self) -> Result<Vec<Certificate>> {
        let mut certificates = self.read_certificates(CertificateLayout::Development).await?;
        certificates.extend(self.read_certificates(CertificateLayout::Distribution).await?);
        Ok(certificates)
    }

    /// Read all listings and download every profile and certificate
    ///
    /// The trust anchor is fetched first (unless already on disk), then
    /// devices, profiles and certificates are read, then the profiles and
    /// the certificates are downloaded. Profiles in the result carry the
    /// UUID decoded from their download.
    ///
    /// # Errors
    ///
    /// Returns the first authentication, network, filesystem or decoder
    /// failure; nothing is retried.
    pub async fn fetch_site_data(&mut self) -> Result<SiteData> {
        tokio::fs::create_dir_all(&self.config.download_dir).await?;

        let anchor = {
            let downloader = self.downloader();
            downloader.ensure_trust_anchor(&self.urls.root_certificate).await?
        };

        let devices = self.read_devices().await?;
        let mut profiles = self.read_all_profiles().await?;
        let certificates = self.read_all_certificates().await?;
        info!(
            "Found {} devices, {} profiles and {} certificates",
            devices.len(),
            profiles.len(),
            certificates.len()
        );

        let progress = ArtifactProgress::new(
            profiles.len() + certificates.len(),
            self.config.enable_progress_bar,
        );
        let downloader = self.downloader();

        for profile in profiles.iter_mut() {
            progress.start(format!("{} profile {}", profile.kind(), profile.blob_id()));
            info!("Downloading {} profile {}", profile.kind(), profile.blob_id());
            let saved = downloader.download_profile(profile, &anchor).await?;
            info!(
                "Saved {} profile {} (UUID='{}', NAME='{}') to '{}'",
                profile.kind(),
                profile.blob_id(),
                profile.uuid().unwrap_or_default(),
                profile.name(),
                saved.display()
            );
            progress.advance();
        }

        for certificate in &certificates {
            progress.start(format!(
                "{} certificate {}",
                certificate.kind(),
                certificate.display_id()
            ));
            info!(
                "Downloading {} certificate {}",
                certificate.kind(),
                certificate.display_id()
            );
            let saved = downloader.download_certificate(certificate).await?;
            info!(
                "Saved {} certificate {} (NAME='{}') to '{}'",
                certificate.kind(),
                certificate.display_id(),
                certificate.name(),
                saved.display()
            );
            progress.advance();
        }
        progress.finish();

        Ok(SiteData {
            devices,
            profiles,
            certificates,
        })
    }

    fn downloader(&self) -> ArtifactDownloader<'_> {
        ArtifactDownloader::new(
            self.authenticator.client(),
            self.resolver.as_ref(),
            &self.config.download_dir,
            self.config.profile_naming,
        )
    }
}
