//! Certificate tables
//!
//! The development and distribution pages use different cell classes for the
//! same fields, described by [`CertificateLayout`]. A row is only a
//! certificate if its action cell holds a download form; other rows are
//! revocation placeholders or pending requests.

use scraper::{ElementRef, Selector};

use crate::app::client::Page;
use crate::app::extract::{
    cell_text, child_link, compile, first, text_of, Extraction, PageExtractor,
};
use crate::app::models::{Certificate, SigningKind};
use crate::constants::selectors;
use crate::errors::ScrapeResult;

/// Cell classes of one certificate page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateLayout {
    Development,
    Distribution,
}

impl CertificateLayout {
    pub fn kind(&self) -> SigningKind {
        match self {
            Self::Development => SigningKind::Development,
            Self::Distribution => SigningKind::Distribution,
        }
    }

    /// Selectors for (action, name, expiration, profiles)
    fn cells(&self) -> [&'static str; 4] {
        match self {
            Self::Development => [
                selectors::DEV_CERT_ACTION,
                selectors::DEV_CERT_NAME,
                selectors::DEV_CERT_EXPIRATION,
                selectors::DEV_CERT_PROFILES,
            ],
            Self::Distribution => [
                selectors::DIST_CERT_ACTION,
                selectors::DIST_CERT_NAME,
                selectors::DIST_CERT_EXPIRATION,
                selectors::DIST_CERT_PROFILES,
            ],
        }
    }
}

/// Extracts [`Certificate`] records from one certificate layout
#[derive(Debug)]
pub struct CertificateExtractor {
    layout: CertificateLayout,
    rows: Selector,
    message: Selector,
    action: Selector,
    form: Selector,
    name: Selector,
    expiration: Selector,
    profiles: Selector,
    status: Selector,
}

impl CertificateExtractor {
    pub fn new(layout: CertificateLayout) -> ScrapeResult<Self> {
        let [action, name, expiration, profiles] = layout.cells();
        Ok(Self {
            layout,
            rows: compile(selectors::CERTIFICATE_ROWS)?,
            message: compile(selectors::CERTIFICATE_MESSAGE)?,
            action: compile(action)?,
            form: compile("form")?,
            name: compile(name)?,
            expiration: compile(expiration)?,
            profiles: compile(profiles)?,
            status: compile(selectors::CERTIFICATE_STATUS)?,
        })
    }

    pub fn layout(&self) -> CertificateLayout {
        self.layout
    }

    /// The action cell, if it offers a download form
    fn download_cell<'a>(&self, row: &ElementRef<'a>) -> Option<ElementRef<'a>> {
        first(row, &self.action).filter(|cell| first(cell, &self.form).is_some())
    }

    fn parse_row(
        &self,
        row: &ElementRef<'_>,
        action: &ElementRef<'_>,
        page: &Page,
    ) -> Option<Certificate> {
        let download_url = child_link(action, page)?;
        let name = cell_text(row, &self.name)?;
        let expiration_date = cell_text(row, &self.expiration)?;
        let profile_summary = cell_text(row, &self.profiles)?;
        let status = cell_text(row, &self.status)?;
        Certificate::new(
            self.layout.kind(),
            name,
            expiration_date,
            profile_summary,
            status,
            download_url,
        )
    }
}

impl PageExtractor for CertificateExtractor {
    type Record = Certificate;

    fn extract(&self, page: &Page) -> Extraction<Certificate> {
        let document = page.document();
        let mut extraction = Extraction::default();
        for row in document.select(&self.rows) {
            let Some(action) = self.download_cell(&row) else {
                if let Some(message) = first(&row, &self.message).map(|span| text_of(&span)) {
                    if !message.is_empty() {
                        extraction.notes.push(message);
                    }
                }
                continue;
            };
            match self.parse_row(&row, &action, page) {
                Some(certificate) => extraction.records.push(certificate),
                None => tracing::trace!("Skipping incomplete {} certificate row", self.layout.kind()),
            }
        }
        extraction
    }
}
