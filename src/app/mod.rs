//! Core application logic for DevCenter Fetcher
//!
//! This module contains the portal session, page extractors, artifact
//! downloads, profile decoding and the fetch orchestration.
//!
//! # Examples
//!
//! ```rust,no_run
//! use devcenter_fetcher::app::{
//!     Authenticator, DeviceExtractor, PageExtractor, PortalClient,
//! };
//! use devcenter_fetcher::auth::Credentials;
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = Credentials {
//!     login: "jane@example.com".to_string(),
//!     password: "secret".to_string(),
//!     team_id: None,
//! };
//! let mut authenticator = Authenticator::new(PortalClient::new()?, credentials);
//!
//! let url = Url::parse("https://developer.apple.com/ios/manage/devices/index.action")?;
//! let page = authenticator.ensure_ready(&url).await?;
//! for device in DeviceExtractor::new()?.extract(&page).records {
//!     println!("{} {}", device.udid, device.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod client;
pub mod coordinator;
pub mod extract;
pub mod models;
pub mod resolver;

// Re-export main public API
pub use artifacts::{ArtifactDownloader, ProfileNaming};
pub use client::{
    Authenticator, ClientConfig, FormMethod, HtmlForm, Page, PortalClient, ProxyConfig,
    SessionState,
};
pub use coordinator::{ArtifactProgress, FetchConfig, SiteFetcher, SiteUrls};
pub use extract::{
    CertificateExtractor, CertificateLayout, DeviceExtractor, Extraction, PageExtractor,
    ProfileExtractor,
};
pub use models::{derive_download_id, Certificate, Device, Profile, SigningKind, SiteData};
pub use resolver::{CommandUuidResolver, UuidResolver};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_structure() {
        // Ensure public API is accessible
        let config = ClientConfig::default();
        assert!(config.proxy.is_none());
        assert_eq!(ProfileNaming::default(), ProfileNaming::Uuid);
        assert_eq!(SigningKind::ALL.len(), 2);
    }
}
