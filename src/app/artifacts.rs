//! Materialising profiles and certificates on disk
//!
//! Profiles are saved under their blob id, decoded for their UUID, then
//! renamed to `<uuid>.mobileprovision` (or `<name>.mobileprovision`).
//! Certificates are saved directly as `<displayId>.cer`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::app::client::PortalClient;
use crate::app::models::{Certificate, Profile};
use crate::app::resolver::UuidResolver;
use crate::constants::files;
use crate::errors::{DownloadError, DownloadResult, Result};

/// Basename used for a saved profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileNaming {
    /// The UUID embedded in the profile
    #[default]
    Uuid,
    /// The profile's display name
    Name,
}

/// Downloads artifacts into one directory through an authenticated session
pub struct ArtifactDownloader<'a> {
    client: &'a PortalClient,
    resolver: &'a dyn UuidResolver,
    download_dir: &'a Path,
    naming: ProfileNaming,
}

impl<'a> ArtifactDownloader<'a> {
    pub fn new(
        client: &'a PortalClient,
        resolver: &'a dyn UuidResolver,
        download_dir: &'a Path,
        naming: ProfileNaming,
    ) -> Self {
        Self {
            client,
            resolver,
            download_dir,
            naming,
        }
    }

    /// Path of the cached root certificate
    pub fn trust_anchor_path(&self) -> PathBuf {
        self.download_dir.join(files::TRUST_ANCHOR_FILE_NAME)
    }

    /// Download the root certificate unless it is already on disk
    pub async fn ensure_trust_anchor(&self, url: &Url) -> DownloadResult<PathBuf> {
        let path = self.trust_anchor_path();
        if tokio::fs::try_exists(&path).await? {
            debug!("Trust anchor already present at {}", path.display());
            return Ok(path);
        }
        info!("Downloading trust anchor from {}", url);
        self.client.save(url, &path).await?;
        Ok(path)
    }

    /// Save `profile`, record its UUID and move it to its final name
    pub async fn download_profile(&self, profile: &mut Profile, anchor: &Path) -> Result<PathBuf> {
        let url = parse_download_url(profile.download_url())?;
        let staged = self.download_dir.join(format!(
            "{}.{}",
            safe_file_stem(profile.blob_id()),
            files::PROFILE_EXTENSION
        ));
        self.client.save(&url, &staged).await?;

        let uuid = self.resolver.resolve(&staged, anchor).await?;
        profile.set_uuid(uuid.clone());

        let stem = match self.naming {
            ProfileNaming::Uuid => uuid,
            ProfileNaming::Name => profile.name().to_string(),
        };
        let destination = self.download_dir.join(format!(
            "{}.{}",
            safe_file_stem(&stem),
            files::PROFILE_EXTENSION
        ));
        if destination != staged {
            tokio::fs::rename(&staged, &destination)
                .await
                .map_err(|_| DownloadError::RenameFailed {
                    from: staged.clone(),
                    to: destination.clone(),
                })?;
        }
        debug!("Saved profile '{}' as {}", profile.name(), destination.display());
        Ok(destination)
    }

    /// Save `certificate` as `<displayId>.cer`
    pub async fn download_certificate(&self, certificate: &Certificate) -> DownloadResult<PathBuf> {
        let url = parse_download_url(certificate.download_url())?;
        let destination = self.download_dir.join(format!(
            "{}.{}",
            safe_file_stem(certificate.display_id()),
            files::CERTIFICATE_EXTENSION
        ));
        self.client.save(&url, &destination).await?;
        debug!(
            "Saved certificate '{}' as {}",
            certificate.name(),
            destination.display()
        );
        Ok(destination)
    }
}

fn parse_download_url(url: &str) -> DownloadResult<Url> {
    Url::parse(url).map_err(|e| DownloadError::InvalidUrl {
        url: url.to_string(),
        error: e.to_string(),
    })
}

/// Replace path separators so a portal-supplied name stays inside the download dir
pub fn safe_file_stem(stem: &str) -> String {
    stem.chars()
        .map(|c| if matches!(c, '/' | '\\') || c.is_control() { '_' } else { c })
        .collect()
}
