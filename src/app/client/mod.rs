//! HTTP session for the developer portal
//!
//! The portal has no API, so the session behaves like a browser: it keeps
//! cookies across requests, sends a browser user agent, and submits the forms
//! it is served.
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: Core request operations and traffic logging
//! - `page`: Fetched pages and their parsed documents
//! - `form`: Named HTML forms and their submission data
//! - `download`: Binary saves with atomic writes
//! - `auth`: The login/team-selection state machine

use std::path::Path;

use url::Url;

use crate::errors::{AuthResult, DownloadError, DownloadResult};

pub mod auth;
pub mod config;
pub mod download;
pub mod form;
pub mod http;
pub mod page;

pub use auth::{Authenticator, SessionState};
pub use config::{ClientConfig, ProxyConfig};
pub use form::{FormMethod, HtmlForm};
pub use page::Page;

use download::DownloadHandler;
use http::HttpHandler;

/// Cookie-keeping HTTP session against the portal
#[derive(Debug)]
pub struct PortalClient {
    http_handler: HttpHandler,
}

impl PortalClient {
    /// Creates a new session with default configuration and the environment proxy
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if HTTP client creation fails
    pub fn new() -> AuthResult<Self> {
        Self::with_config(&ClientConfig::from_env())
    }

    /// Creates a new session with custom configuration
    pub fn with_config(config: &ClientConfig) -> AuthResult<Self> {
        let client = config.build_http_client()?;
        Ok(Self {
            http_handler: HttpHandler::new(client),
        })
    }

    /// Fetch a page
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` on network failure or a non-success status
    pub async fn fetch(&self, url: &Url) -> DownloadResult<Page> {
        self.http_handler.get_page(url).await
    }

    /// Submit a form found on `page` and return the response page
    pub async fn submit(&self, form: HtmlForm, page: &Page) -> DownloadResult<Page> {
        let action = form
            .action_url(page.url())
            .ok_or_else(|| DownloadError::InvalidUrl {
                url: page.url().to_string(),
                error: format!("form '{}' has an unusable action", form.name()),
            })?;
        tracing::debug!("Submitting form '{}' to {}", form.name(), action);

        let method = form.method();
        let pairs = form.into_pairs();
        let response = match method {
            FormMethod::Post => self.http_handler.post_form(&action, &pairs).await?,
            FormMethod::Get => self.http_handler.get_form(&action, &pairs).await?,
        };
        HttpHandler::into_page(response).await
    }

    /// Save the raw body at `url` to `destination`
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the request fails or the file cannot be written
    pub async fn save(&self, url: &Url, destination: &Path) -> DownloadResult<u64> {
        DownloadHandler::new(&self.http_handler)
            .save(url, destination)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_creation() {
        assert!(PortalClient::with_config(&ClientConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_submit_get_form() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "devices"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>found</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let page_url = Url::parse(&format!("{}/index", server.uri())).unwrap();
        let page = Page::new(
            page_url,
            200,
            r#"<form name="search" method="get" action="/search"><input name="q" value="devices"></form>"#,
        );
        let form = HtmlForm::find(&page.document(), "search").unwrap();

        let client = PortalClient::with_config(&ClientConfig::default()).unwrap();
        let result = client.submit(form, &page).await.unwrap();
        assert_eq!(result.body(), "<html>found</html>");
    }
}
