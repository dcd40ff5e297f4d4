use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::{
    billing::BillingType,
    regions::Region,
    utils::{iso_timestamp, slugify},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum Plan {
    #[serde(alias = "pro")]
    Pro,
    #[serde(alias = "enterprise")]
    Enterprise,
    #[default]
    #[serde(alias = "all")]
    All,
}

impl Plan {
    /// The list page doesn't tag plans, only the product names carry them
    pub fn from_product_name(product: &str) -> Self {
        let words = product
            .split(|c: char| !c.is_alphanumeric())
            .map(|word| word.to_lowercase())
            .collect::<Vec<String>>();

        if words.iter().any(|word| word == "enterprise") {
            Plan::Enterprise
        } else if words.iter().any(|word| word == "pro") {
            Plan::Pro
        } else {
            Plan::All
        }
    }

    /// Whether an item tagged with `self` can be bought on `plan`
    pub fn available_on(self, plan: Plan) -> bool {
        self == Plan::All || plan == Plan::All || self == plan
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingItem {
    pub id: String,
    pub region: String,
    pub product: String,
    #[serde(default)]
    pub plan: Plan,
    pub billing_unit: String,
    #[serde(default)]
    pub billed_annually: Option<String>,
    #[serde(default)]
    pub billed_month_to_month: Option<String>,
    #[serde(default)]
    pub on_demand: Option<String>,
}

impl PricingItem {
    pub fn new(
        region: impl Into<String>,
        product: impl Into<String>,
        billing_unit: impl Into<String>,
    ) -> Self {
        let product = product.into();
        let billing_unit = billing_unit.into();

        Self {
            id: slugify(&format!("{product} {billing_unit}")),
            region: region.into(),
            plan: Plan::from_product_name(&product),
            product,
            billing_unit,
            billed_annually: None,
            billed_month_to_month: None,
            on_demand: None,
        }
    }

    pub fn with_prices(
        mut self,
        billed_annually: Option<String>,
        billed_month_to_month: Option<String>,
        on_demand: Option<String>,
    ) -> Self {
        self.billed_annually = billed_annually;
        self.billed_month_to_month = billed_month_to_month;
        self.on_demand = on_demand;
        self
    }

    pub fn has_any_price(&self) -> bool {
        self.billed_annually.is_some()
            || self.billed_month_to_month.is_some()
            || self.on_demand.is_some()
    }

    pub fn price_for(&self, billing_type: BillingType) -> Option<&str> {
        match billing_type {
            BillingType::Annually => self.billed_annually.as_deref(),
            BillingType::Monthly => self.billed_month_to_month.as_deref(),
            BillingType::OnDemand => self.on_demand.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingMetadata {
    pub region: String,
    pub region_name: String,
    pub site: String,
    pub last_sync: String,
    pub products_count: usize,
    pub source_url: String,
}

impl PricingMetadata {
    pub fn new(region: &Region, products_count: usize, source_url: impl Into<String>) -> Self {
        Self {
            region: region.id.to_string(),
            region_name: region.name.to_string(),
            site: region.site.to_string(),
            last_sync: iso_timestamp(),
            products_count,
            source_url: source_url.into(),
        }
    }
}

/// What the product picker needs, without the region bookkeeping
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub id: String,
    pub product: String,
    pub plan: Plan,
    pub billing_unit: String,
    pub billed_annually: Option<String>,
    pub billed_month_to_month: Option<String>,
    pub on_demand: Option<String>,
}

impl From<&PricingItem> for ProductSummary {
    fn from(item: &PricingItem) -> Self {
        Self {
            id: item.id.clone(),
            product: item.product.clone(),
            plan: item.plan,
            billing_unit: item.billing_unit.clone(),
            billed_annually: item.billed_annually.clone(),
            billed_month_to_month: item.billed_month_to_month.clone(),
            on_demand: item.on_demand.clone(),
        }
    }
}
