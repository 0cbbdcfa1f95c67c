//! Turning portal pages into typed records
//!
//! Each extractor walks the table rows of one page layout in document order
//! and builds at most one record per row. Fields are located by the CSS class
//! of their cell, not by column position. A row missing any required cell is
//! skipped: the portal mixes banners, notices and privilege-dependent markup
//! into the same tables, so an unexpected row is normal and never an error.

use scraper::{ElementRef, Selector};

use crate::app::client::Page;
use crate::errors::{ScrapeError, ScrapeResult};

pub mod certificates;
pub mod devices;
pub mod profiles;

pub use certificates::{CertificateExtractor, CertificateLayout};
pub use devices::DeviceExtractor;
pub use profiles::ProfileExtractor;

/// Records found on one page, plus informational rows the portal displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction<T> {
    pub records: Vec<T>,
    pub notes: Vec<String>,
}

impl<T> Default for Extraction<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            notes: Vec::new(),
        }
    }
}

/// A parser for one page layout
pub trait PageExtractor {
    type Record;

    /// Parse every recognisable row of `page`, in document order
    fn extract(&self, page: &Page) -> Extraction<Self::Record>;
}

/// Compile a CSS selector
pub(crate) fn compile(css: &str) -> ScrapeResult<Selector> {
    Selector::parse(css).map_err(|_| ScrapeError::InvalidSelector {
        selector: css.to_string(),
    })
}

/// First element under `row` matching `selector`
pub(crate) fn first<'a>(row: &ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    row.select(selector).next()
}

/// Whitespace-trimmed text of the first element matching `selector`
pub(crate) fn cell_text(row: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    first(row, selector).map(|cell| text_of(&cell))
}

/// Whitespace-trimmed text content of an element
pub(crate) fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Absolute `href` of the first link matching `selector`
pub(crate) fn link(row: &ElementRef<'_>, selector: &Selector, page: &Page) -> Option<String> {
    resolve_href(first(row, selector)?.value().attr("href")?, page)
}

/// Absolute `href` of the first link that is a direct child of `cell`
///
/// Links nested deeper, such as those inside a revoke form, are not considered.
pub(crate) fn child_link(cell: &ElementRef<'_>, page: &Page) -> Option<String> {
    let href = cell
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "a")
        .find_map(|child| child.value().attr("href"))?;
    resolve_href(href, page)
}

fn resolve_href(href: &str, page: &Page) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    page.resolve(href).map(|url| url.to_string())
}
