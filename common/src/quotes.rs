use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};

use crate::{
    billing::{BillingType, ModeAmounts},
    regions::DEFAULT_REGION,
};

/// Largest quantity a line or an allotment credit may hold, stored quantities must fit an i64
pub const MAX_QUANTITY: u64 = i64::MAX as u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemInput {
    // the frontend sends the pricing item id as `id`
    #[serde(default, alias = "id")]
    pub product_id: Option<String>,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub quantity: u64,
    #[serde(default)]
    pub is_allotment: bool,
}

impl LineItemInput {
    pub fn new(product: impl Into<String>, quantity: u64) -> Self {
        Self {
            product_id: None,
            product: product.into(),
            quantity,
            is_allotment: false,
        }
    }

    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    pub fn as_allotment(mut self) -> Self {
        self.is_allotment = true;
        self
    }
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteInput {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_region")]
    pub region: String,
    pub billing_type: BillingType,
    #[serde(default)]
    pub items: Vec<LineItemInput>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub edit_password: Option<String>,
}

impl QuoteInput {
    pub fn new(billing_type: BillingType, items: Vec<LineItemInput>) -> Self {
        Self {
            name: None,
            region: default_region(),
            billing_type,
            items,
            edit_password: None,
        }
    }
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllotmentInfo {
    pub allotted_product: String,
    pub quantity_included: u64,
    pub allotted_unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteLineItem {
    #[serde(default)]
    pub product_id: Option<String>,
    pub product: String,
    pub billing_unit: String,
    pub quantity: u64,
    #[serde(default)]
    pub included_quantity: u64,
    #[serde(default)]
    pub chargeable_quantity: u64,
    /// Price for the quote's billing type. A percentage when `is_percentage` is set.
    pub unit_price: f64,
    pub total_price: f64,
    pub unit_price_annually: f64,
    pub unit_price_monthly: f64,
    pub unit_price_on_demand: f64,
    pub total_price_annually: f64,
    pub total_price_monthly: f64,
    pub total_price_on_demand: f64,
    #[serde(default)]
    pub is_percentage: bool,
    #[serde(default)]
    pub is_allotment: bool,
    #[serde(default)]
    pub allotments: Vec<AllotmentInfo>,
}

impl QuoteLineItem {
    pub fn unit_prices(&self) -> ModeAmounts {
        ModeAmounts {
            annually: self.unit_price_annually,
            monthly: self.unit_price_monthly,
            on_demand: self.unit_price_on_demand,
        }
    }

    pub fn totals(&self) -> ModeAmounts {
        ModeAmounts {
            annually: self.total_price_annually,
            monthly: self.total_price_monthly,
            on_demand: self.total_price_on_demand,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: String,
    pub name: String,
    pub region: String,
    pub billing_type: BillingType,
    pub items: Vec<QuoteLineItem>,
    pub total: f64,
    pub total_annually: f64,
    pub total_monthly: f64,
    pub total_on_demand: f64,
    #[serde(default)]
    pub savings_vs_monthly: f64,
    #[serde(default)]
    pub savings_vs_on_demand: f64,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_password_hash: Option<String>,
    #[serde(default)]
    pub is_protected: bool,
}

impl Quote {
    pub fn totals(&self) -> ModeAmounts {
        ModeAmounts {
            annually: self.total_annually,
            monthly: self.total_monthly,
            on_demand: self.total_on_demand,
        }
    }

    pub fn set_totals(&mut self, totals: ModeAmounts) {
        self.total = totals.get(self.billing_type);
        self.total_annually = totals.annually;
        self.total_monthly = totals.monthly;
        self.total_on_demand = totals.on_demand;
        self.savings_vs_monthly = totals.savings_vs_monthly();
        self.savings_vs_on_demand = totals.savings_vs_on_demand();
    }

    /// Drops the password hash, `is_protected` still tells the frontend to ask for one
    pub fn redacted(mut self) -> Self {
        self.edit_password_hash = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_input_treats_empty_strings_as_missing() {
        let input: QuoteInput = serde_json::from_str(
            r#"{
                "name": "",
                "billing_type": "annual",
                "edit_password": "",
                "items": [{"id": "infrastructure-pro-per-host", "product": "Infrastructure Pro", "quantity": 10}]
            }"#,
        )
        .unwrap();

        assert_eq!(input.name, None);
        assert_eq!(input.edit_password, None);
        assert_eq!(input.region, DEFAULT_REGION);
        assert_eq!(input.billing_type, BillingType::Annually);
        assert_eq!(
            input.items[0].product_id.as_deref(),
            Some("infrastructure-pro-per-host")
        );
        assert!(!input.items[0].is_allotment);
    }

    #[test]
    fn quote_input_requires_billing_type() {
        assert!(serde_json::from_str::<QuoteInput>(r#"{"items": []}"#).is_err());
    }

    #[test]
    fn negative_quantities_are_rejected() {
        assert!(serde_json::from_str::<LineItemInput>(r#"{"product": "APM", "quantity": -1}"#).is_err());
    }

    #[test]
    fn set_totals_follows_billing_type() {
        let mut quote = Quote {
            id: "id".into(),
            name: "name".into(),
            region: DEFAULT_REGION.into(),
            billing_type: BillingType::Monthly,
            items: Vec::new(),
            total: 0.0,
            total_annually: 0.0,
            total_monthly: 0.0,
            total_on_demand: 0.0,
            savings_vs_monthly: 0.0,
            savings_vs_on_demand: 0.0,
            created_at: String::new(),
            updated_at: String::new(),
            edit_password_hash: Some("salt$hash".into()),
            is_protected: true,
        };

        quote.set_totals(ModeAmounts {
            annually: 100.0,
            monthly: 120.0,
            on_demand: 150.0,
        });

        assert_eq!(quote.total, 120.0);
        assert_eq!(quote.savings_vs_monthly, 20.0);
        assert_eq!(quote.savings_vs_on_demand, 50.0);

        let redacted = quote.redacted();
        assert!(redacted.edit_password_hash.is_none());
        assert!(redacted.is_protected);
    }
}
