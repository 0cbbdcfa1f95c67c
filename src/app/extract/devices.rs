//! Registered device table

use scraper::{ElementRef, Selector};

use crate::app::client::Page;
use crate::app::extract::{cell_text, compile, first, Extraction, PageExtractor};
use crate::app::models::Device;
use crate::constants::selectors;
use crate::errors::ScrapeResult;

/// Extracts [`Device`] records from the device listing
#[derive(Debug)]
pub struct DeviceExtractor {
    rows: Selector,
    name: Selector,
    udid: Selector,
}

impl DeviceExtractor {
    pub fn new() -> ScrapeResult<Self> {
        Ok(Self {
            rows: compile(selectors::DEVICE_ROWS)?,
            name: compile(selectors::DEVICE_NAME)?,
            udid: compile(selectors::DEVICE_UDID)?,
        })
    }

    fn parse_row(&self, row: &ElementRef<'_>) -> Option<Device> {
        let name = cell_text(row, &self.name)?;
        // Only the cell's own text; nested markup holds edit links.
        let udid = first(row, &self.udid)?
            .children()
            .filter_map(|node| node.value().as_text().map(|text| text.to_string()))
            .collect::<String>()
            .trim()
            .to_string();
        if udid.is_empty() {
            return None;
        }
        Some(Device { udid, name })
    }
}

impl PageExtractor for DeviceExtractor {
    type Record = Device;

    fn extract(&self, page: &Page) -> Extraction<Device> {
        let document = page.document();
        let records = document
            .select(&self.rows)
            .filter_map(|row| self.parse_row(&row))
            .collect();
        Extraction {
            records,
            notes: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn test_devices_in_order() {
        let body = r#"
            <fieldset id="fs-0"><table><tbody>
                <tr>
                    <td class="name"><span>Jane's iPhone</span></td>
                    <td class="id">0123456789abcdef0123456789abcdef01234567<a href="/edit">edit</a></td>
                </tr>
                <tr><td colspan="2">No devices pending</td></tr>
                <tr>
                    <td class="name"><span>Test iPad</span></td>
                    <td class="id"> fedcba9876543210fedcba9876543210fedcba98 </td>
                </tr>
            </tbody></table></fieldset>
            <fieldset id="fs-1"><table><tbody>
                <tr><td class="name"><span>Removed</span></td><td class="id">1111</td></tr>
            </tbody></table></fieldset>
        "#;
        let page = Page::new(
            Url::parse("https://developer.apple.com/ios/manage/devices/index.action").unwrap(),
            200,
            body,
        );

        let extraction = DeviceExtractor::new().unwrap().extract(&page);
        assert_eq!(
            extraction.records,
            vec![
                Device {
                    udid: "0123456789abcdef0123456789abcdef01234567".to_string(),
                    name: "Jane's iPhone".to_string(),
                },
                Device {
                    udid: "fedcba9876543210fedcba9876543210fedcba98".to_string(),
                    name: "Test iPad".to_string(),
                },
            ]
        );
    }
}
