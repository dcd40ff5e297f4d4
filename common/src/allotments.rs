use serde::{Deserialize, Serialize};

use crate::utils::{iso_timestamp, names_match};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllotmentSource {
    #[default]
    Scraped,
    Manual,
}

/// Buying one unit of `parent_product` includes `quantity_per_parent` units of `allotted_product`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allotment {
    pub parent_product: String,
    pub allotted_product: String,
    pub quantity_per_parent: u64,
    pub allotted_unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_parent_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allotted_product_id: Option<String>,
    // raw cell text, only present on scraped rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_on_demand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_on_demand: Option<String>,
}

impl Allotment {
    pub fn new(
        parent_product: impl Into<String>,
        allotted_product: impl Into<String>,
        quantity_per_parent: u64,
        allotted_unit: impl Into<String>,
    ) -> Self {
        Self {
            parent_product: parent_product.into(),
            allotted_product: allotted_product.into(),
            quantity_per_parent,
            allotted_unit: allotted_unit.into(),
            per_parent_unit: None,
            frequency: None,
            parent_product_id: None,
            allotted_product_id: None,
            monthly_on_demand: None,
            hourly_on_demand: None,
        }
    }

    pub fn with_per_parent_unit(mut self, per_parent_unit: impl Into<String>) -> Self {
        self.per_parent_unit = Some(per_parent_unit.into());
        self
    }

    pub fn with_frequency(mut self, frequency: impl Into<String>) -> Self {
        self.frequency = Some(frequency.into());
        self
    }

    pub fn is_parent(&self, product_id: Option<&str>, product: &str) -> bool {
        if let (Some(rule_id), Some(product_id)) = (self.parent_product_id.as_deref(), product_id)
            && rule_id == product_id
        {
            return true;
        }

        names_match(&self.parent_product, product)
    }

    pub fn is_allotted(&self, product_id: Option<&str>, product: &str) -> bool {
        if let (Some(rule_id), Some(product_id)) =
            (self.allotted_product_id.as_deref(), product_id)
            && rule_id == product_id
        {
            return true;
        }

        names_match(&self.allotted_product, product)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllotmentsMetadata {
    pub last_sync: String,
    pub allotments_count: usize,
    #[serde(default)]
    pub source: AllotmentSource,
    pub source_url: String,
}

impl AllotmentsMetadata {
    pub fn new(
        allotments_count: usize,
        source: AllotmentSource,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            last_sync: iso_timestamp(),
            allotments_count,
            source,
            source_url: source_url.into(),
        }
    }
}
