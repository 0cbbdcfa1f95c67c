//! Fetched portal pages

use scraper::{Html, Selector};
use url::Url;

/// An HTML page returned by the portal
#[derive(Debug, Clone)]
pub struct Page {
    url: Url,
    status: u16,
    body: String,
}

impl Page {
    pub fn new(url: Url, status: u16, body: impl Into<String>) -> Self {
        Self {
            url,
            status,
            body: body.into(),
        }
    }

    /// Final URL after redirects
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parse the page into a queryable element tree
    pub fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }

    /// Whether the page contains a form with the given `name`
    pub fn has_form(&self, name: &str) -> bool {
        match Selector::parse(&format!("form[name='{}']", name)) {
            Ok(selector) => self.document().select(&selector).next().is_some(),
            Err(_) => false,
        }
    }

    /// Resolve a link found on this page
    pub fn resolve(&self, href: &str) -> Option<Url> {
        self.url.join(href).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> Page {
        Page::new(
            Url::parse("https://portal.example/ios/manage/devices/index.action").unwrap(),
            200,
            body,
        )
    }

    #[test]
    fn test_has_form() {
        let p = page(r#"<html><body><form name="appleConnectForm" action="/login"></form></body></html>"#);
        assert!(p.has_form("appleConnectForm"));
        assert!(!p.has_form("saveTeamSelection"));
    }

    #[test]
    fn test_resolve_relative_link() {
        let p = page("<html></html>");
        let url = p.resolve("/ios/manage/certificates/team/download.action?certDisplayId=AB").unwrap();
        assert_eq!(
            url.as_str(),
            "https://portal.example/ios/manage/certificates/team/download.action?certDisplayId=AB"
        );
    }
}
