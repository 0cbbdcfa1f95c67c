//! Data models for DevCenter Fetcher
//!
//! Records are produced once by the page extractors and are plain data
//! afterwards. Download identifiers are derived from the download link at
//! construction time and cannot be set any other way.

use serde::Serialize;

use crate::constants::ids;

/// Development or distribution flavour of a profile or certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SigningKind {
    Development,
    Distribution,
}

impl SigningKind {
    /// Both kinds in the order the portal is visited
    pub const ALL: [SigningKind; 2] = [SigningKind::Development, SigningKind::Distribution];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Distribution => "distribution",
        }
    }
}

impl std::fmt::Display for SigningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extract the identifier that follows `marker` in a download link
///
/// The value runs up to the next `&` or `#`. Returns `None` when the marker is
/// absent or the value is empty.
pub fn derive_download_id(download_url: &str, marker: &str) -> Option<String> {
    let (_, rest) = download_url.split_once(marker)?;
    let id = rest.split(['&', '#']).next().unwrap_or_default();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// A provisioning profile listed by the portal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    uuid: Option<String>,
    #[serde(rename = "type")]
    kind: SigningKind,
    name: String,
    #[serde(rename = "appId")]
    app_id: String,
    #[serde(rename = "statusXcode")]
    status_label: String,
    #[serde(skip)]
    download_url: String,
    #[serde(skip)]
    blob_id: String,
}

impl Profile {
    /// Build a profile, or `None` if no blob id can be derived from the link
    pub fn new(
        kind: SigningKind,
        name: impl Into<String>,
        app_id: impl Into<String>,
        status_label: impl Into<String>,
        download_url: impl Into<String>,
    ) -> Option<Self> {
        let download_url = download_url.into();
        let blob_id = derive_download_id(&download_url, ids::PROFILE_ID_MARKER)?;
        Some(Self {
            uuid: None,
            kind,
            name: name.into(),
            app_id: app_id.into(),
            status_label: status_label.into(),
            download_url,
            blob_id,
        })
    }

    pub fn kind(&self) -> SigningKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn status_label(&self) -> &str {
        &self.status_label
    }

    pub fn download_url(&self) -> &str {
        &self.download_url
    }

    pub fn blob_id(&self) -> &str {
        &self.blob_id
    }

    /// UUID recovered from the downloaded profile, if it has been decoded
    pub fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    /// Record the UUID decoded from the downloaded artifact
    pub fn set_uuid(&mut self, uuid: impl Into<String>) {
        self.uuid = Some(uuid.into());
    }
}

/// A signing certificate listed by the portal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Certificate {
    #[serde(rename = "displayId")]
    display_id: String,
    #[serde(rename = "type")]
    kind: SigningKind,
    name: String,
    #[serde(rename = "exp_date")]
    expiration_date: String,
    status: String,
    #[serde(rename = "profile")]
    profile_summary: String,
    #[serde(skip)]
    download_url: String,
}

impl Certificate {
    /// Build a certificate, or `None` if the link carries no display id
    pub fn new(
        kind: SigningKind,
        name: impl Into<String>,
        expiration_date: impl Into<String>,
        profile_summary: impl Into<String>,
        status: impl Into<String>,
        download_url: impl Into<String>,
    ) -> Option<Self> {
        let download_url = download_url.into();
        let display_id = derive_download_id(&download_url, ids::CERTIFICATE_ID_MARKER)?;
        Some(Self {
            display_id,
            kind,
            name: name.into(),
            expiration_date: expiration_date.into(),
            status: status.into(),
            profile_summary: profile_summary.into(),
            download_url,
        })
    }

    pub fn kind(&self) -> SigningKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Expiration date as displayed by the portal
    pub fn expiration_date(&self) -> &str {
        &self.expiration_date
    }

    /// Free-text list of profiles using this certificate
    pub fn profile_summary(&self) -> &str {
        &self.profile_summary
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn download_url(&self) -> &str {
        &self.download_url
    }

    pub fn display_id(&self) -> &str {
        &self.display_id
    }
}

/// A registered device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    pub udid: String,
    pub name: String,
}

/// Everything fetched in one run, in the JSON dump shape
#[derive(Debug, Clone, Default, Serialize)]
pub struct SiteData {
    pub devices: Vec<Device>,
    pub profiles: Vec<Profile>,
    pub certificates: Vec<Certificate>,
}

impl SiteData {
    /// Render the pretty-printed JSON dump
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_id_from_download_url() {
        let cert = Certificate::new(
            SigningKind::Development,
            "iPhone Developer: Jane Doe",
            "Mar 03, 2012",
            "Team Profile",
            "Issued",
            "https://developer.apple.com/ios/manage/certificates/team/action?certDisplayId=ABC123",
        )
        .unwrap();
        assert_eq!(cert.display_id(), "ABC123");
    }

    #[test]
    fn test_marker_position_changes_id() {
        let first = derive_download_id("/download.action?certDisplayId=AAA&x=1", "certDisplayId=");
        let second = derive_download_id("/download.action?x=1&certDisplayId=BBB", "certDisplayId=");
        assert_eq!(first.as_deref(), Some("AAA"));
        assert_eq!(second.as_deref(), Some("BBB"));
    }

    #[test]
    fn test_profile_blob_id_is_first_query_value() {
        let profile = Profile::new(
            SigningKind::Distribution,
            "App Store",
            "ABCDE12345.com.example.app",
            "Active",
            "https://developer.apple.com/ios/manage/provisioningprofiles/download.action?blobId=4F2C9A&type=1",
        )
        .unwrap();
        assert_eq!(profile.blob_id(), "4F2C9A");
        assert!(profile.uuid().is_none());
    }

    #[test]
    fn test_missing_marker_yields_no_record() {
        assert!(Profile::new(SigningKind::Development, "a", "b", "c", "/download.action").is_none());
        assert!(Certificate::new(
            SigningKind::Distribution,
            "a",
            "b",
            "c",
            "d",
            "/download.action?certDisplayId="
        )
        .is_none());
    }

    #[test]
    fn test_json_dump_schema() {
        let mut profile = Profile::new(
            SigningKind::Development,
            "Team Profile",
            "ABCDE12345.*",
            "Active",
            "https://portal.example/download.action?blobId=77",
        )
        .unwrap();
        profile.set_uuid("3f2504e0-4f89-11d3-9a0c-0305e82c3301");

        let site = SiteData {
            devices: vec![Device {
                udid: "0123456789abcdef0123456789abcdef01234567".to_string(),
                name: "Jane's iPhone".to_string(),
            }],
            profiles: vec![profile],
            certificates: vec![Certificate::new(
                SigningKind::Distribution,
                "iPhone Distribution: Example",
                "Jan 01, 2013",
                "App Store",
                "Issued",
                "https://portal.example/download.action?certDisplayId=XYZ",
            )
            .unwrap()],
        };

        let value = serde_json::to_value(&site).unwrap();
        assert_eq!(
            value,
            json!({
                "devices": [
                    {"udid": "0123456789abcdef0123456789abcdef01234567", "name": "Jane's iPhone"}
                ],
                "profiles": [{
                    "uuid": "3f2504e0-4f89-11d3-9a0c-0305e82c3301",
                    "type": "development",
                    "name": "Team Profile",
                    "appId": "ABCDE12345.*",
                    "statusXcode": "Active"
                }],
                "certificates": [{
                    "displayId": "XYZ",
                    "type": "distribution",
                    "name": "iPhone Distribution: Example",
                    "exp_date": "Jan 01, 2013",
                    "status": "Issued",
                    "profile": "App Store"
                }]
            })
        );

        let text = site.to_json().unwrap();
        assert!(!text.contains("download"));
    }
}
