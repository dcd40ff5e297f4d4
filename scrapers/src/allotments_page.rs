use std::{collections::HashSet, sync::LazyLock};

use common::{allotments::Allotment, regions::ALLOTMENTS_URL};
use crawler::request::{Request, RequestBuilder};
use regex::Regex;
use scraper::Html;
use tracing::debug;

use crate::{
    errors::ScraperError,
    traits::PageScraper,
    utils::{
        conversions::quantity_to_u64,
        html::{element_has_attr, element_to_text, row_cells, selector},
        regex::capture_group,
    },
};

static LEADING_QUANTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\d,\.]+)\s*(.+)$").expect("quantity regex to compile"));

// "custom metrics per host per month"
static UNIT_PER_PARENT_PER_PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s+per\s+(.+?)\s+per\s+(month|hour)").expect("allotment regex to compile")
});

// "spans per month"
static UNIT_PER_PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s+per\s+(month|hour)").expect("allotment regex to compile")
});

// "custom metrics per host"
static UNIT_PER_PARENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s+per\s+(.+)$").expect("allotment regex to compile"));

const HEADER_MARKERS: [&str; 3] = ["parent product", "allotted product", "monthly"];

/// A parsed allotment cell such as "100 custom metrics per host per month"
#[derive(Debug, Clone, PartialEq)]
pub struct AllotmentValue {
    pub quantity: Option<u64>,
    pub allotted_unit: Option<String>,
    pub per_parent_unit: Option<String>,
    pub frequency: Option<String>,
    pub raw: String,
}

impl AllotmentValue {
    fn raw(raw: String) -> Self {
        Self {
            quantity: None,
            allotted_unit: None,
            per_parent_unit: None,
            frequency: None,
            raw,
        }
    }
}

pub fn parse_allotment_value(value: &str) -> Option<AllotmentValue> {
    let value = value.trim().to_lowercase();

    if value.is_empty() {
        return None;
    }

    let (Some(quantity), Some(remainder)) = (
        capture_group(&LEADING_QUANTITY, &value, 1),
        capture_group(&LEADING_QUANTITY, &value, 2),
    ) else {
        return Some(AllotmentValue::raw(value));
    };

    let mut parsed = AllotmentValue::raw(value.clone());
    parsed.quantity = quantity_to_u64(&quantity).ok();

    if let Some(captures) = UNIT_PER_PARENT_PER_PERIOD.captures(&remainder) {
        parsed.allotted_unit = Some(captures[1].trim().to_string());
        parsed.per_parent_unit = Some(captures[2].trim().to_string());
        parsed.frequency = Some(captures[3].trim().to_string());
    } else if let Some(captures) = UNIT_PER_PERIOD.captures(&remainder) {
        parsed.allotted_unit = Some(captures[1].trim().to_string());
        parsed.frequency = Some(captures[2].trim().to_string());
    } else if let Some(captures) = UNIT_PER_PARENT.captures(&remainder) {
        parsed.allotted_unit = Some(captures[1].trim().to_string());
        parsed.per_parent_unit = Some(captures[2].trim().to_string());
    } else {
        parsed.allotted_unit = Some(remainder);
    }

    Some(parsed)
}

/// Reads the allotments table, where a parent product cell spans several allotted rows
pub struct AllotmentsPageScraper {
    url: String,
}

impl Default for AllotmentsPageScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl AllotmentsPageScraper {
    pub fn new() -> Self {
        Self {
            url: ALLOTMENTS_URL.to_string(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn build_allotment(
        parent: String,
        allotted_product: String,
        monthly: String,
        hourly: Option<String>,
    ) -> Option<Allotment> {
        let value = parse_allotment_value(&monthly)?;

        let Some(quantity) = value.quantity else {
            debug!("No quantity in allotment value {:?}", value.raw);
            return None;
        };

        let allotted_unit = value
            .allotted_unit
            .unwrap_or_else(|| allotted_product.to_lowercase());

        let mut allotment = Allotment::new(parent, allotted_product, quantity, allotted_unit);
        allotment.per_parent_unit = value.per_parent_unit;
        allotment.frequency = value.frequency;
        allotment.monthly_on_demand = Some(monthly);
        allotment.hourly_on_demand = hourly.filter(|text| !text.is_empty());

        Some(allotment)
    }
}

impl PageScraper for AllotmentsPageScraper {
    type Output = Allotment;

    fn scraper_name(&self) -> &'static str {
        "allotments"
    }

    fn build_page_request(&self) -> Request {
        RequestBuilder::new()
            .set_url(self.url.clone())
            .set_headers(&[("Accept".into(), "text/html".into())])
            .build()
    }

    fn parse_response(&self, response: &str) -> Result<Vec<Allotment>, ScraperError> {
        let html = Html::parse_document(response);
        let table_selector = selector("table")?;
        let row_selector = selector("tr")?;
        let cell_selector = selector("th, td")?;

        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut results: Vec<Allotment> = Vec::new();

        for table in html.select(&table_selector) {
            let mut current_parent: Option<String> = None;

            for row in table.select(&row_selector) {
                let cells = row_cells(row, &cell_selector);

                if cells.len() < 3 {
                    continue;
                }

                if element_has_attr(cells[0], "rowspan") {
                    current_parent = Some(element_to_text(cells[0]));
                }

                let texts = cells.into_iter().map(element_to_text).collect::<Vec<String>>();

                let first = texts[0].to_lowercase();
                if HEADER_MARKERS.iter().any(|marker| first.contains(marker)) {
                    continue;
                }

                let (parent, allotted, monthly, hourly) = if texts.len() >= 4 {
                    let parent = match texts[0].is_empty() {
                        true => current_parent.clone().unwrap_or_default(),
                        false => texts[0].clone(),
                    };

                    (parent, texts[1].clone(), texts[2].clone(), texts.get(3).cloned())
                } else if let Some(parent) = current_parent.clone() {
                    (parent, texts[0].clone(), texts[1].clone(), texts.get(2).cloned())
                } else {
                    continue;
                };

                if parent.is_empty() || allotted.is_empty() {
                    continue;
                }

                if parent.to_lowercase().contains("parent product")
                    || allotted.to_lowercase().contains("allotted product")
                {
                    continue;
                }

                let Some(allotment) = Self::build_allotment(parent, allotted, monthly, hourly)
                else {
                    continue;
                };

                let key = (
                    allotment.parent_product.clone(),
                    allotment.allotted_product.clone(),
                );

                if seen.insert(key) {
                    results.push(allotment);
                }
            }
        }

        Ok(results)
    }
}
