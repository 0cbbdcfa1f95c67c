//! Provisioning profile tables
//!
//! Development and distribution profile pages share one layout.

use scraper::{ElementRef, Selector};

use crate::app::client::Page;
use crate::app::extract::{cell_text, compile, first, link, text_of, Extraction, PageExtractor};
use crate::app::models::{Profile, SigningKind};
use crate::constants::selectors;
use crate::errors::ScrapeResult;

/// Extracts [`Profile`] records from a profile listing
#[derive(Debug)]
pub struct ProfileExtractor {
    kind: SigningKind,
    rows: Selector,
    name: Selector,
    app_id: Selector,
    status: Selector,
    download: Selector,
}

impl ProfileExtractor {
    pub fn new(kind: SigningKind) -> ScrapeResult<Self> {
        Ok(Self {
            kind,
            rows: compile(selectors::PROFILE_ROWS)?,
            name: compile(selectors::PROFILE_NAME)?,
            app_id: compile(selectors::PROFILE_APP_ID)?,
            status: compile(selectors::PROFILE_STATUS)?,
            download: compile(selectors::PROFILE_DOWNLOAD)?,
        })
    }

    fn parse_row(&self, row: &ElementRef<'_>, page: &Page) -> Option<Profile> {
        let name = cell_text(row, &self.name)?;
        let app_id = cell_text(row, &self.app_id)?;
        // Status cells carry extra lines (e.g. renewal hints) below the label.
        let status = first(row, &self.status).map(|cell| {
            text_of(&cell)
                .lines()
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        })?;
        let download_url = link(row, &self.download, page)?;
        Profile::new(self.kind, name, app_id, status, download_url)
    }
}

impl PageExtractor for ProfileExtractor {
    type Record = Profile;

    fn extract(&self, page: &Page) -> Extraction<Profile> {
        let document = page.document();
        let mut extraction = Extraction::default();
        for row in document.select(&self.rows) {
            match self.parse_row(&row, page) {
                Some(profile) => extraction.records.push(profile),
                None => tracing::trace!("Skipping unrecognised {} profile row", self.kind),
            }
        }
        extraction
    }
}
