//! Core HTTP operations for the portal session
//!
//! Every request goes through [`HttpHandler`], which rejects non-success
//! statuses and records request/response lines on the traffic log target.
//! Requests are never retried.

use reqwest::{Client, Response};
use url::Url;

use crate::app::client::page::Page;
use crate::constants::http::TRAFFIC_TARGET;
use crate::errors::{DownloadError, DownloadResult};

/// HTTP operations handler
#[derive(Debug, Clone)]
pub struct HttpHandler {
    client: Client,
}

impl HttpHandler {
    /// Creates a new HttpHandler around a configured client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Issue a GET request and return the successful response
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` on network failure or a non-success status
    pub async fn get_response(&self, url: &Url) -> DownloadResult<Response> {
        tracing::debug!(target: TRAFFIC_TARGET, "GET {}", url);
        let response = self.client.get(url.as_str()).send().await?;
        Self::check_status(response)
    }

    /// Submit form pairs with POST, url-encoded
    pub async fn post_form(
        &self,
        url: &Url,
        pairs: &[(String, String)],
    ) -> DownloadResult<Response> {
        tracing::debug!(target: TRAFFIC_TARGET, "POST {} ({} fields)", url, pairs.len());
        let response = self.client.post(url.as_str()).form(pairs).send().await?;
        Self::check_status(response)
    }

    /// Submit form pairs with GET, appended as query parameters
    pub async fn get_form(&self, url: &Url, pairs: &[(String, String)]) -> DownloadResult<Response> {
        let mut target = url.clone();
        target
            .query_pairs_mut()
            .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        self.get_response(&target).await
    }

    /// Fetches an HTML page
    pub async fn get_page(&self, url: &Url) -> DownloadResult<Page> {
        let response = self.get_response(url).await?;
        Self::into_page(response).await
    }

    /// Read a response body into a [`Page`]
    pub async fn into_page(response: Response) -> DownloadResult<Page> {
        let url = response.url().clone();
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!(target: TRAFFIC_TARGET, "Read {} bytes from {}", body.len(), url);
        Ok(Page::new(url, status, body))
    }

    fn check_status(response: Response) -> DownloadResult<Response> {
        let status = response.status();
        tracing::debug!(
            target: TRAFFIC_TARGET,
            "{} {}",
            status.as_u16(),
            response.url()
        );
        if !status.is_success() {
            return Err(DownloadError::ServerError {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::client::config::ClientConfig;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn handler() -> HttpHandler {
        HttpHandler::new(ClientConfig::default().build_http_client().unwrap())
    }

    #[tokio::test]
    async fn test_get_page_reads_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/devices"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/devices", server.uri())).unwrap();
        let page = handler().get_page(&url).await.unwrap();
        assert_eq!(page.status(), 200);
        assert_eq!(page.body(), "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();
        match handler().get_page(&url).await.unwrap_err() {
            DownloadError::ServerError { status, .. } => assert_eq!(status, 404),
            other => panic!("Expected DownloadError::ServerError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_post_form_encodes_pairs() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_string_contains("theAccountName=jane%40example.com"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/login", server.uri())).unwrap();
        let pairs = vec![("theAccountName".to_string(), "jane@example.com".to_string())];
        handler().post_form(&url, &pairs).await.unwrap();
    }
}
