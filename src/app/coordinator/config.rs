//! Configuration structures for a portal fetch
//!
//! This module defines which portal pages are visited and where and how the
//! downloaded artifacts are stored.

use std::path::PathBuf;

use url::Url;

use crate::app::artifacts::ProfileNaming;
use crate::app::models::SigningKind;

/// Portal pages visited during a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrls {
    pub development_profiles: Url,
    pub distribution_profiles: Url,
    pub development_certificates: Url,
    pub distribution_certificates: Url,
    pub devices: Url,
    /// Root certificate, fetched without authentication
    pub root_certificate: Url,
}

impl SiteUrls {
    /// Listing page for profiles of `kind`
    pub fn profiles(&self, kind: SigningKind) -> &Url {
        match kind {
            SigningKind::Development => &self.development_profiles,
            SigningKind::Distribution => &self.distribution_profiles,
        }
    }

    /// Listing page for certificates of `kind`
    pub fn certificates(&self, kind: SigningKind) -> &Url {
        match kind {
            SigningKind::Development => &self.development_certificates,
            SigningKind::Distribution => &self.distribution_certificates,
        }
    }

    /// Point every page at `base`, keeping the paths
    ///
    /// Useful when the portal is served from a mirror or a local test server.
    pub fn rebase(&self, base: &Url) -> Self {
        let move_to = |url: &Url| {
            let mut moved = base.clone();
            moved.set_path(url.path());
            moved.set_query(url.query());
            moved
        };
        Self {
            development_profiles: move_to(&self.development_profiles),
            distribution_profiles: move_to(&self.distribution_profiles),
            development_certificates: move_to(&self.development_certificates),
            distribution_certificates: move_to(&self.distribution_certificates),
            devices: move_to(&self.devices),
            root_certificate: move_to(&self.root_certificate),
        }
    }
}

/// Configuration for the site fetcher
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Directory receiving all artifacts
    pub download_dir: PathBuf,
    /// Basename used for saved profiles
    pub profile_naming: ProfileNaming,
    /// Enable the artifact progress bar
    pub enable_progress_bar: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("."),
            profile_naming: ProfileNaming::Uuid,
            enable_progress_bar: true,
        }
    }
}

impl FetchConfig {
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    pub fn with_profile_naming(mut self, naming: ProfileNaming) -> Self {
        self.profile_naming = naming;
        self
    }

    /// Enable or disable the progress bar
    pub fn with_progress_bar(mut self, enabled: bool) -> Self {
        self.enable_progress_bar = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PortalConfigToml;

    #[test]
    fn test_urls_by_kind() {
        let urls = PortalConfigToml::default().to_site_urls().unwrap();
        assert!(urls
            .profiles(SigningKind::Distribution)
            .path()
            .ends_with("viewDistributionProfiles.action"));
        assert!(urls
            .certificates(SigningKind::Development)
            .path()
            .ends_with("team/index.action"));
    }

    #[test]
    fn test_rebase_keeps_paths() {
        let urls = PortalConfigToml::default().to_site_urls().unwrap();
        let base = Url::parse("http://127.0.0.1:8080").unwrap();
        let moved = urls.rebase(&base);
        assert_eq!(
            moved.devices.as_str(),
            "http://127.0.0.1:8080/ios/manage/devices/index.action"
        );
        assert_eq!(
            moved.root_certificate.as_str(),
            "http://127.0.0.1:8080/appleca/AppleIncRootCertificate.cer"
        );
    }

    #[test]
    fn test_builder() {
        let config = FetchConfig::default()
            .with_download_dir("/tmp/out")
            .with_profile_naming(ProfileNaming::Name)
            .with_progress_bar(false);
        assert_eq!(config.download_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.profile_naming, ProfileNaming::Name);
        assert!(!config.enable_progress_bar);
    }
}
