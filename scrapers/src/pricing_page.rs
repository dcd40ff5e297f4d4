use std::collections::HashSet;

use common::{pricing::PricingItem, regions::Region};
use crawler::request::{Request, RequestBuilder};
use scraper::Html;
use tracing::debug;

use crate::{
    errors::ScraperError,
    traits::PageScraper,
    utils::html::{element_to_text, row_cells, selector},
};

const MIN_COLUMNS: usize = 4;
const DEFAULT_BILLING_UNIT: &str = "per unit";

/// Reads the public price list: product, billing unit, then one column per billing mode
pub struct PricingPageScraper {
    region: &'static Region,
    url: String,
}

impl PricingPageScraper {
    pub fn new(region: &'static Region) -> Self {
        Self {
            region,
            url: region.url.to_string(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn parse_row(&self, cells: &[String]) -> Option<PricingItem> {
        let mut product = cells[0].clone();
        let billing_unit = cells[1].clone();

        if product.is_empty() || product.eq_ignore_ascii_case("product") {
            return None;
        }

        // some rows repeat the unit inside the product cell
        if !billing_unit.is_empty() && product.contains(&billing_unit) {
            product = product.replace(&billing_unit, "").trim().to_string();
        }

        if product.is_empty() {
            return None;
        }

        let billing_unit = match billing_unit.is_empty() {
            true => DEFAULT_BILLING_UNIT.to_string(),
            false => billing_unit,
        };

        let price_cell = |index: usize| {
            cells
                .get(index)
                .filter(|text| !text.is_empty())
                .cloned()
        };

        let item = PricingItem::new(self.region.id, product, billing_unit).with_prices(
            price_cell(2),
            price_cell(3),
            price_cell(4),
        );

        item.has_any_price().then_some(item)
    }
}

impl PageScraper for PricingPageScraper {
    type Output = PricingItem;

    fn scraper_name(&self) -> &'static str {
        "pricing"
    }

    fn build_page_request(&self) -> Request {
        RequestBuilder::new()
            .set_url(self.url.clone())
            .set_headers(&[("Accept".into(), "text/html".into())])
            .build()
    }

    fn parse_response(&self, response: &str) -> Result<Vec<PricingItem>, ScraperError> {
        let html = Html::parse_document(response);
        let table_selector = selector("table")?;
        let row_selector = selector("tr")?;
        let cell_selector = selector("th, td")?;

        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut results: Vec<PricingItem> = Vec::new();

        for table in html.select(&table_selector) {
            for row in table.select(&row_selector) {
                let cells = row_cells(row, &cell_selector)
                    .into_iter()
                    .map(element_to_text)
                    .collect::<Vec<String>>();

                if cells.len() < MIN_COLUMNS {
                    continue;
                }

                let Some(item) = self.parse_row(&cells) else {
                    debug!("Skipping pricing row {:?}", cells);
                    continue;
                };

                if seen.insert((item.product.clone(), item.billing_unit.clone())) {
                    results.push(item);
                }
            }
        }

        Ok(results)
    }
}
