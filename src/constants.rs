//! Application constants for DevCenter Fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain.

use std::time::Duration;

/// Environment variable names
pub mod env {
    /// Portal login (Apple ID)
    pub const LOGIN: &str = "ADC_LOGIN";

    /// Portal password
    pub const PASSWORD: &str = "ADC_PASSWORD";

    /// Team identifier for accounts in several teams
    pub const TEAM_ID: &str = "ADC_TEAM_ID";

    /// Key for passwords stored encrypted in the config file
    pub const SECRET_KEY: &str = "ADC_SECRET_KEY";

    /// Proxy variables, checked in order
    pub const PROXY_VARS: [&str; 2] = ["HTTPS_PROXY", "https_proxy"];
}

/// Encrypted config password format
pub mod secret {
    /// Marks a stored password as encrypted
    pub const ENCRYPTED_PREFIX: &str = "enc:";

    /// Leading bytes of every encrypted payload
    pub const MAGIC: &[u8; 4] = b"ADC1";

    /// XChaCha20-Poly1305 nonce length
    pub const NONCE_LEN: usize = 24;
}

/// Login and team-selection form identifiers
pub mod auth {
    /// Name of the login form
    pub const LOGIN_FORM: &str = "appleConnectForm";

    /// Login field of the login form
    pub const LOGIN_FIELD: &str = "theAccountName";

    /// Password field of the login form
    pub const PASSWORD_FIELD: &str = "theAccountPW";

    /// Name of the team selection form
    pub const TEAM_FORM: &str = "saveTeamSelection";

    /// Team list of the team selection form
    pub const TEAM_SELECT: &str = "memberDisplayId";

    /// Submit button of the team selection form
    pub const TEAM_SUBMIT_BUTTON: &str = "action:saveTeamSelection!save";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Browser user agent; the portal serves different markup to unknown agents
    pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; U; Intel Mac OS X 10_6_2; de-at) AppleWebKit/531.21.8 (KHTML, like Gecko) Version/4.0.4 Safari/531.21.10";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Target used for request/response traffic log events
    pub const TRAFFIC_TARGET: &str = "devcenter_fetcher::traffic";
}

/// Portal URLs
pub mod portal {
    /// Development provisioning profiles
    pub const DEVELOPMENT_PROFILES_URL: &str =
        "https://developer.apple.com/ios/my/provision/index.action";

    /// Distribution provisioning profiles
    pub const DISTRIBUTION_PROFILES_URL: &str =
        "https://developer.apple.com/ios/manage/provisioningprofiles/viewDistributionProfiles.action";

    /// Development certificates
    pub const DEVELOPMENT_CERTIFICATES_URL: &str =
        "https://developer.apple.com/ios/manage/certificates/team/index.action";

    /// Distribution certificates
    pub const DISTRIBUTION_CERTIFICATES_URL: &str =
        "https://developer.apple.com/ios/manage/certificates/team/distribute.action";

    /// Registered devices
    pub const DEVICES_URL: &str = "https://developer.apple.com/ios/manage/devices/index.action";

    /// Root certificate used as trust anchor when decoding profiles
    pub const ROOT_CERTIFICATE_URL: &str =
        "http://www.apple.com/appleca/AppleIncRootCertificate.cer";
}

/// CSS selectors for the portal page layouts
pub mod selectors {
    /// Profile table rows
    pub const PROFILE_ROWS: &str = "table tbody tr";
    pub const PROFILE_NAME: &str = "td.profile a";
    pub const PROFILE_APP_ID: &str = "td.appid";
    pub const PROFILE_STATUS: &str = "td.statusXcode";
    pub const PROFILE_DOWNLOAD: &str = "td.action a[href]";

    /// Certificate table rows (both layouts)
    pub const CERTIFICATE_ROWS: &str = "div.nt_multi table tbody tr";
    pub const CERTIFICATE_MESSAGE: &str = "td[colspan='4'] span";
    pub const CERTIFICATE_STATUS: &str = "td.status";

    /// Development certificate layout
    pub const DEV_CERT_ACTION: &str = "td.last";
    pub const DEV_CERT_NAME: &str = "td.name div p";
    pub const DEV_CERT_EXPIRATION: &str = "td.date";
    pub const DEV_CERT_PROFILES: &str = "td.profiles";

    /// Distribution certificate layout
    pub const DIST_CERT_ACTION: &str = "td.action.last";
    pub const DIST_CERT_NAME: &str = "td.name a";
    pub const DIST_CERT_EXPIRATION: &str = "td.expdate";
    pub const DIST_CERT_PROFILES: &str = "td.profile";

    /// Device table rows
    pub const DEVICE_ROWS: &str = "fieldset#fs-0 table tbody tr";
    pub const DEVICE_NAME: &str = "td.name span";
    pub const DEVICE_UDID: &str = "td.id";
}

/// Download identifier markers
pub mod ids {
    /// Profiles are keyed by the first query value of their download link
    pub const PROFILE_ID_MARKER: &str = "=";

    /// Certificates are keyed by their display id parameter
    pub const CERTIFICATE_ID_MARKER: &str = "certDisplayId=";
}

/// File operation constants
pub mod files {
    /// Temporary file suffix for atomic operations
    pub const TEMP_FILE_SUFFIX: &str = ".tmp";

    /// Cached trust anchor file name
    pub const TRUST_ANCHOR_FILE_NAME: &str = "AppleIncRootCertificate.cer";

    /// Provisioning profile extension
    pub const PROFILE_EXTENSION: &str = "mobileprovision";

    /// Traffic log written by `--logfile` without a value
    pub const DEFAULT_LOG_FILE: &str = "devcenter_fetcher.log";

    /// Certificate extension
    pub const CERTIFICATE_EXTENSION: &str = "cer";

    /// Project-local configuration file name
    pub const LOCAL_CONFIG_FILE: &str = "devcenter-fetcher.toml";

    /// Directory name under the user config dir
    pub const CONFIG_DIR_NAME: &str = "devcenter-fetcher";
}

/// External profile decoder defaults
pub mod decoder {
    /// Program invoked to read fields from a signed profile
    pub const DEFAULT_PROGRAM: &str = "mobileprovisioning";

    /// Placeholder replaced by the profile path
    pub const PROFILE_PLACEHOLDER: &str = "{profile}";

    /// Placeholder replaced by the trust anchor path
    pub const ANCHOR_PLACEHOLDER: &str = "{anchor}";

    /// Field requested from the decoder
    pub const UUID_FIELD: &str = "UUID";
}
