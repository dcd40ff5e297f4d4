use serde::{Deserialize, Serialize};

use crate::{billing::BillingType, regions::DEFAULT_REGION};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateItem {
    pub product: String,
    #[serde(default)]
    pub product_id: Option<String>,
    pub quantity: u64,
}

/// A canned set of line items the frontend can start a quote from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub billing_type: BillingType,
    #[serde(default)]
    pub items: Vec<TemplateItem>,
    #[serde(default)]
    pub created_at: String,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}
