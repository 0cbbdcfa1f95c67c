//! Recovering the UUID embedded in a downloaded provisioning profile
//!
//! Profiles are signed messages; reading them is left to an external decoder
//! behind the [`UuidResolver`] trait so the download pipeline does not depend
//! on how decoding is done.

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::config::DecoderConfig;
use crate::constants::decoder;
use crate::errors::{ResolverError, ResolverResult};

/// Reads the `UUID` field of a provisioning profile
#[async_trait]
pub trait UuidResolver: Send + Sync {
    /// Decode `profile`, verifying its signature against `anchor`
    async fn resolve(&self, profile: &Path, anchor: &Path) -> ResolverResult<String>;
}

/// Runs an external program and reads the UUID from its standard output
#[derive(Debug, Clone)]
pub struct CommandUuidResolver {
    program: String,
    args: Vec<String>,
}

impl CommandUuidResolver {
    /// `args` may contain `{profile}` and `{anchor}` placeholders
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &DecoderConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments with placeholders substituted
    pub fn arguments(&self, profile: &Path, anchor: &Path) -> Vec<String> {
        let profile = profile.to_string_lossy();
        let anchor = anchor.to_string_lossy();
        self.args
            .iter()
            .map(|arg| {
                arg.replace(decoder::PROFILE_PLACEHOLDER, &profile)
                    .replace(decoder::ANCHOR_PLACEHOLDER, &anchor)
            })
            .collect()
    }
}

#[async_trait]
impl UuidResolver for CommandUuidResolver {
    async fn resolve(&self, profile: &Path, anchor: &Path) -> ResolverResult<String> {
        let args = self.arguments(profile, anchor);
        debug!("Running {} {:?}", self.program, args);

        let output = tokio::process::Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|source| ResolverError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ResolverError::DecoderFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        validate_uuid(profile, stdout.trim())
    }
}

/// Accept decoder output only if it is a UUID
pub fn validate_uuid(profile: &Path, output: &str) -> ResolverResult<String> {
    match uuid::Uuid::parse_str(output) {
        Ok(_) => Ok(output.to_string()),
        Err(_) => Err(ResolverError::InvalidOutput {
            path: profile.to_path_buf(),
            output: output.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_placeholders_substituted() {
        let resolver = CommandUuidResolver::from_config(&DecoderConfig::default());
        let args = resolver.arguments(
            &PathBuf::from("/tmp/B1.mobileprovision"),
            &PathBuf::from("/tmp/AppleIncRootCertificate.cer"),
        );
        assert_eq!(
            args,
            vec![
                "/tmp/B1.mobileprovision",
                "-c",
                "/tmp/AppleIncRootCertificate.cer",
                "-d",
                "UUID"
            ]
        );
    }

    #[test]
    fn test_validate_uuid() {
        let path = PathBuf::from("p.mobileprovision");
        assert_eq!(
            validate_uuid(&path, "3F2504E0-4F89-11D3-9A0C-0305E82C3301").unwrap(),
            "3F2504E0-4F89-11D3-9A0C-0305E82C3301"
        );
        assert!(matches!(
            validate_uuid(&path, ""),
            Err(ResolverError::InvalidOutput { .. })
        ));
        assert!(matches!(
            validate_uuid(&path, "Error: could not verify signature"),
            Err(ResolverError::InvalidOutput { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_output_is_trimmed() {
        let resolver = CommandUuidResolver::new(
            "printf",
            vec!["%s\\n".to_string(), "3f2504e0-4f89-11d3-9a0c-0305e82c3301".to_string()],
        );
        let uuid = resolver
            .resolve(Path::new("a.mobileprovision"), Path::new("anchor.cer"))
            .await
            .unwrap();
        assert_eq!(uuid, "3f2504e0-4f89-11d3-9a0c-0305e82c3301");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_failure() {
        let resolver = CommandUuidResolver::new("false", Vec::new());
        let result = resolver
            .resolve(Path::new("a.mobileprovision"), Path::new("anchor.cer"))
            .await;
        assert!(matches!(result, Err(ResolverError::DecoderFailed { .. })));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let resolver = CommandUuidResolver::new("devcenter-fetcher-no-such-decoder", Vec::new());
        let result = resolver
            .resolve(Path::new("a.mobileprovision"), Path::new("anchor.cer"))
            .await;
        assert!(matches!(result, Err(ResolverError::Spawn { .. })));
    }
}
