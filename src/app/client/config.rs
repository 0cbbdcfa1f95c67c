//! HTTP client configuration and building logic
//!
//! This module handles the configuration and construction of the cookie-keeping
//! HTTP client used for the whole portal session.

use std::env;
use std::time::Duration;

use reqwest::{Client, Proxy};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{env as env_constants, http};
use crate::errors::{AuthError, AuthResult};

/// Proxy endpoint taken from the environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
}

impl ProxyConfig {
    /// Read the proxy from `HTTPS_PROXY`/`https_proxy`, if set to `scheme://host:port`
    pub fn from_env() -> Option<Self> {
        env_constants::PROXY_VARS
            .iter()
            .filter_map(|name| env::var(name).ok())
            .find_map(|value| Self::parse(&value))
    }

    /// Parse a proxy setting, accepting a bare `host:port` as well
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let with_scheme = if value.contains("://") {
            value.to_string()
        } else {
            format!("http://{}", value)
        };
        let url = Url::parse(&with_scheme).ok()?;
        let host = url.host_str()?.to_string();
        let port = url.port_or_known_default()?;
        Some(Self { host, port })
    }

    /// Proxy URL handed to reqwest
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Configuration for the portal HTTP session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Request timeout
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Browser-identifying user agent
    pub user_agent: String,
    /// Optional proxy for all requests
    pub proxy: Option<ProxyConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            user_agent: http::USER_AGENT.to_string(),
            proxy: None,
        }
    }
}

impl ClientConfig {
    /// Default configuration with the proxy taken from the environment
    pub fn from_env() -> Self {
        Self {
            proxy: ProxyConfig::from_env(),
            ..Default::default()
        }
    }

    /// Builds the HTTP client with the specified configuration
    pub fn build_http_client(&self) -> AuthResult<Client> {
        let mut client_builder = Client::builder()
            .cookie_store(true) // session cookies carry login and team selection
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(self.user_agent.as_str())
            .no_proxy();

        if let Some(proxy) = &self.proxy {
            tracing::info!("Using proxy {}:{}", proxy.host, proxy.port);
            client_builder = client_builder.proxy(Proxy::all(proxy.url()).map_err(AuthError::Http)?);
        }

        client_builder.build().map_err(AuthError::Http)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.request_timeout, http::DEFAULT_TIMEOUT);
        assert!(config.user_agent.contains("Safari"));
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_proxy_parsing() {
        let proxy = ProxyConfig::parse("http://proxy.corp.example:3128").unwrap();
        assert_eq!(proxy.host, "proxy.corp.example");
        assert_eq!(proxy.port, 3128);

        let bare = ProxyConfig::parse("10.0.0.1:8080").unwrap();
        assert_eq!(bare.host, "10.0.0.1");
        assert_eq!(bare.port, 8080);

        assert!(ProxyConfig::parse("").is_none());
        assert!(ProxyConfig::parse("   ").is_none());
    }

    #[test]
    fn test_http_client_creation() {
        let config = ClientConfig::default();
        assert!(config.build_http_client().is_ok());
    }

    #[test]
    fn test_http_client_with_proxy() {
        let config = ClientConfig {
            request_timeout: Duration::from_secs(5),
            proxy: Some(ProxyConfig {
                host: "127.0.0.1".to_string(),
                port: 3128,
            }),
            ..Default::default()
        };
        assert!(config.build_http_client().is_ok());
    }
}
