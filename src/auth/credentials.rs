//! Credential resolution for the developer portal
//!
//! Login, password and team id are looked up, in order, from command-line
//! flags, environment variables (including a `.env` file loaded at startup),
//! and the accounts stored in the config file. A password that is still
//! missing is prompted for when running on a terminal. Config passwords may be
//! stored encrypted (see [`crate::auth::secret`]).

use std::env;
use std::io::{self, IsTerminal};
use std::path::Path;

use crate::auth::secret;
use crate::config::AppConfig;
use crate::constants::env as env_constants;
use crate::errors::{AuthError, AuthResult};

/// Portal account used for one run
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub login: String,
    pub password: String,
    pub team_id: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .field("team_id", &self.team_id)
            .finish()
    }
}

/// Values given explicitly on the command line
#[derive(Debug, Clone, Default)]
pub struct CredentialOverrides {
    pub login: Option<String>,
    pub password: Option<String>,
    pub team_id: Option<String>,
    /// Key for an encrypted config password
    pub secret_key: Option<String>,
}

/// Where each credential would come from
#[derive(Debug, Clone)]
pub struct AuthStatus {
    /// Whether the login environment variable is set
    pub login_env_set: bool,
    /// Whether the password environment variable is set
    pub password_env_set: bool,
    /// Whether the team environment variable is set
    pub team_env_set: bool,
    /// Whether .env file exists in current directory
    pub dotenv_file_exists: bool,
    /// Login of the config account that would be used
    pub config_account: Option<String>,
    /// Whether that account stores a password
    pub config_password_set: bool,
    /// Whether the stored password is encrypted
    pub config_password_encrypted: bool,
    /// Whether the secret key environment variable is set
    pub secret_key_env_set: bool,
}

impl AuthStatus {
    /// Check whether a login and password are available without prompting
    pub fn has_credentials(&self) -> bool {
        (self.login_env_set || self.config_account.is_some())
            && (self.password_env_set || self.config_password_set)
    }

    /// Get descriptive status message for display
    pub fn status_message(&self) -> String {
        match (
            self.login_env_set || self.config_account.is_some(),
            self.has_credentials(),
        ) {
            (false, _) => "No login configured - pass --user, set ADC_LOGIN or add an account".to_string(),
            (true, false) => "Login configured, password will be prompted for".to_string(),
            (true, true) => "Credentials configured".to_string(),
        }
    }
}

/// Check current credential sources
pub fn get_auth_status(config: &AppConfig) -> AuthStatus {
    let env_login = non_empty_env(env_constants::LOGIN);
    let account = config.account(env_login.as_deref());
    AuthStatus {
        login_env_set: env_login.is_some(),
        password_env_set: non_empty_env(env_constants::PASSWORD).is_some(),
        team_env_set: non_empty_env(env_constants::TEAM_ID).is_some(),
        dotenv_file_exists: Path::new(".env").exists(),
        config_account: account.map(|a| a.login.clone()),
        config_password_set: account.map(|a| a.password.is_some()).unwrap_or(false),
        config_password_encrypted: account
            .and_then(|a| a.password.as_deref())
            .map(secret::is_encrypted)
            .unwrap_or(false),
        secret_key_env_set: non_empty_env(env_constants::SECRET_KEY).is_some(),
    }
}

/// Resolve credentials without prompting
///
/// Returns the login, password (if found anywhere) and team id.
///
/// A login with no matching config account is fine; the account then
/// contributes nothing.
///
/// # Errors
///
/// `MissingCredentials` when no login can be found, or a decryption error
/// when the config password is needed but cannot be decrypted.
pub fn lookup_credentials(
    overrides: &CredentialOverrides,
    config: &AppConfig,
) -> AuthResult<(String, Option<String>, Option<String>)> {
    let login = overrides
        .login
        .clone()
        .or_else(|| non_empty_env(env_constants::LOGIN));
    let account = config.account(login.as_deref());

    let login = login
        .or_else(|| account.map(|a| a.login.clone()))
        .ok_or(AuthError::MissingCredentials)?;

    let password = match overrides
        .password
        .clone()
        .or_else(|| non_empty_env(env_constants::PASSWORD))
    {
        Some(password) => Some(password),
        None => account
            .and_then(|a| a.password.as_deref())
            .map(|stored| {
                secret::decrypt_password(stored, &secret_key(overrides.secret_key.as_deref()))
            })
            .transpose()?,
    };

    let team_id = overrides
        .team_id
        .clone()
        .or_else(|| non_empty_env(env_constants::TEAM_ID))
        .or_else(|| account.and_then(|a| a.team_id.clone()));

    Ok((login, password, team_id))
}

/// Resolve credentials, prompting for a missing password on a terminal
pub fn resolve_credentials(
    overrides: &CredentialOverrides,
    config: &AppConfig,
) -> AuthResult<Credentials> {
    let (login, password, team_id) = lookup_credentials(overrides, config)?;
    let password = match password {
        Some(password) => password,
        None if io::stdin().is_terminal() => prompt_password(&login)?,
        None => return Err(AuthError::MissingCredentials),
    };
    Ok(Credentials {
        login,
        password,
        team_id,
    })
}

/// Secret key for encrypted config passwords
///
/// `explicit` wins over `ADC_SECRET_KEY`; with neither the key is empty.
pub fn secret_key(explicit: Option<&str>) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| non_empty_env(env_constants::SECRET_KEY))
        .unwrap_or_default()
}

/// Prompt for the portal password of `login`
pub fn prompt_password(login: &str) -> AuthResult<String> {
    let password = rpassword::prompt_password(format!("Password for '{}': ", login))?;
    if password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(password)
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Print where credentials would come from
pub fn show_auth_status(config: &AppConfig) {
    let status = get_auth_status(config);

    println!("Portal Authentication Status");
    println!("============================");
    println!();
    println!(
        "{}: {}",
        env_constants::LOGIN,
        if status.login_env_set { "Set" } else { "Not set" }
    );
    println!(
        "{}: {}",
        env_constants::PASSWORD,
        if status.password_env_set { "Set" } else { "Not set" }
    );
    println!(
        "{}: {}",
        env_constants::TEAM_ID,
        if status.team_env_set { "Set" } else { "Not set" }
    );
    println!(
        ".env file: {}",
        if status.dotenv_file_exists {
            "Exists"
        } else {
            "Not found"
        }
    );
    match &status.config_account {
        Some(login) => println!(
            "Config account: {} (password {})",
            login,
            match (status.config_password_set, status.config_password_encrypted) {
                (true, true) => "stored encrypted",
                (true, false) => "stored",
                _ => "not stored",
            }
        ),
        None => println!("Config account: None"),
    }
    println!(
        "{}: {}",
        env_constants::SECRET_KEY,
        if status.secret_key_env_set { "Set" } else { "Not set" }
    );
    println!();
    println!("Status: {}", status.status_message());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests in this module mutate process environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var(env_constants::LOGIN);
        env::remove_var(env_constants::PASSWORD);
        env::remove_var(env_constants::TEAM_ID);
        env::remove_var(env_constants::SECRET_KEY);
    }

    fn config_with_account() -> AppConfig {
        AppConfig::parse(
            r#"
default_account = "stored@example.com"

[[accounts]]
login = "stored@example.com"
password = "stored-secret"
team_id = "AAAAA11111"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_overrides_win() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var(env_constants::LOGIN, "env@example.com");

        let overrides = CredentialOverrides {
            login: Some("cli@example.com".to_string()),
            password: Some("cli-secret".to_string()),
            team_id: None,
            secret_key: None,
        };
        let (login, password, team) = lookup_credentials(&overrides, &AppConfig::default()).unwrap();
        assert_eq!(login, "cli@example.com");
        assert_eq!(password.as_deref(), Some("cli-secret"));
        assert!(team.is_none());
        clear_env();
    }

    #[test]
    fn test_config_account_fills_gaps() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let (login, password, team) =
            lookup_credentials(&CredentialOverrides::default(), &config_with_account()).unwrap();
        assert_eq!(login, "stored@example.com");
        assert_eq!(password.as_deref(), Some("stored-secret"));
        assert_eq!(team.as_deref(), Some("AAAAA11111"));
    }

    #[test]
    fn test_env_beats_config() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var(env_constants::PASSWORD, "env-secret");
        env::set_var(env_constants::TEAM_ID, "ZZZZZ99999");

        let (_, password, team) =
            lookup_credentials(&CredentialOverrides::default(), &config_with_account()).unwrap();
        assert_eq!(password.as_deref(), Some("env-secret"));
        assert_eq!(team.as_deref(), Some("ZZZZZ99999"));
        clear_env();
    }

    fn config_with_encrypted_password(secret_key: &str) -> AppConfig {
        let stored = secret::encrypt_password("stored-secret", secret_key).unwrap();
        AppConfig::parse(&format!(
            "[[accounts]]\nlogin = \"stored@example.com\"\npassword = \"{}\"\n",
            stored
        ))
        .unwrap()
    }

    #[test]
    fn test_encrypted_config_password() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        let config = config_with_encrypted_password("s3cret");

        let overrides = CredentialOverrides {
            secret_key: Some("s3cret".to_string()),
            ..Default::default()
        };
        let (_, password, _) = lookup_credentials(&overrides, &config).unwrap();
        assert_eq!(password.as_deref(), Some("stored-secret"));

        env::set_var(env_constants::SECRET_KEY, "s3cret");
        let (_, password, _) = lookup_credentials(&CredentialOverrides::default(), &config).unwrap();
        assert_eq!(password.as_deref(), Some("stored-secret"));
        assert!(get_auth_status(&config).config_password_encrypted);
        clear_env();
    }

    #[test]
    fn test_wrong_secret_key() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        let config = config_with_encrypted_password("s3cret");

        let overrides = CredentialOverrides {
            secret_key: Some("guess".to_string()),
            ..Default::default()
        };
        let result = lookup_credentials(&overrides, &config);
        assert!(matches!(result, Err(AuthError::PasswordDecryption)));

        // Not consulted when the password comes from elsewhere
        let overrides = CredentialOverrides {
            password: Some("cli-secret".to_string()),
            secret_key: Some("guess".to_string()),
            ..Default::default()
        };
        let (_, password, _) = lookup_credentials(&overrides, &config).unwrap();
        assert_eq!(password.as_deref(), Some("cli-secret"));
    }

    #[test]
    fn test_missing_login() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let result = lookup_credentials(&CredentialOverrides::default(), &AppConfig::default());
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn test_auth_status_messages() {
        let mut status = AuthStatus {
            login_env_set: false,
            password_env_set: false,
            team_env_set: false,
            dotenv_file_exists: false,
            config_account: None,
            config_password_set: false,
            config_password_encrypted: false,
            secret_key_env_set: false,
        };
        assert!(status.status_message().contains("No login"));

        status.login_env_set = true;
        assert!(status.status_message().contains("prompted"));

        status.password_env_set = true;
        assert!(status.has_credentials());
        assert_eq!(status.status_message(), "Credentials configured");
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials {
            login: "jane@example.com".to_string(),
            password: "hunter2".to_string(),
            team_id: None,
        };
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("jane@example.com"));
    }
}
