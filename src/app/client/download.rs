//! Saving binary responses to disk with atomic writes
//!
//! Bodies are written to a `.tmp` sibling first and renamed into place, so an
//! interrupted run never leaves a truncated artifact under its final name.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::app::client::http::HttpHandler;
use crate::constants::files;
use crate::errors::{DownloadError, DownloadResult};

/// File download operations handler
pub struct DownloadHandler<'a> {
    http_handler: &'a HttpHandler,
}

impl<'a> DownloadHandler<'a> {
    /// Creates a new DownloadHandler with the given HTTP handler
    pub fn new(http_handler: &'a HttpHandler) -> Self {
        Self { http_handler }
    }

    /// Download `url` and save the body at `destination`
    ///
    /// An existing file at `destination` is replaced.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the request fails or the file cannot be written
    pub async fn save(&self, url: &Url, destination: &Path) -> DownloadResult<u64> {
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let temp_path = temp_path_for(destination);
        let written = match self.write_to(url, &temp_path).await {
            Ok(written) => written,
            Err(e) => {
                if temp_path.exists() {
                    let _ = tokio::fs::remove_file(&temp_path).await;
                }
                return Err(e);
            }
        };

        tokio::fs::rename(&temp_path, destination)
            .await
            .map_err(|_e| DownloadError::AtomicOperationFailed {
                temp_path: temp_path.clone(),
                final_path: destination.to_path_buf(),
            })?;

        tracing::debug!("Saved {} bytes to {}", written, destination.display());
        Ok(written)
    }

    async fn write_to(&self, url: &Url, temp_path: &Path) -> DownloadResult<u64> {
        let response = self.http_handler.get_response(url).await?;
        let bytes = response.bytes().await?;

        let mut file = File::create(temp_path).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;

        Ok(bytes.len() as u64)
    }
}

/// Temporary sibling path used while a download is in flight
pub fn temp_path_for(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    destination.with_file_name(format!("{}{}", name, files::TEMP_FILE_SUFFIX))
}
