use std::sync::LazyLock;

use common::{billing::BillingType, pricing::PricingItem};
use regex::Regex;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?|\.\d+").expect("number regex to compile"));

const UNAVAILABLE_MARKERS: [&str; 3] = ["-", "—", "n/a"];

/// A price cell as the vendor writes it, e.g. "$15", "$0.10 per GB", "3%", "Included"
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceValue {
    Unavailable,
    Included,
    Flat(f64),
    Percentage(f64),
}

impl PriceValue {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim) else {
            return PriceValue::Unavailable;
        };

        let lowered = raw.to_lowercase();

        if lowered.is_empty() || UNAVAILABLE_MARKERS.contains(&lowered.as_str()) {
            return PriceValue::Unavailable;
        }

        if lowered.contains("included") || lowered == "free" {
            return PriceValue::Included;
        }

        let Some(number) = first_number(&lowered) else {
            return PriceValue::Unavailable;
        };

        match lowered.contains('%') {
            true => PriceValue::Percentage(number),
            false => PriceValue::Flat(number),
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, PriceValue::Unavailable)
    }

    pub fn is_percentage(&self) -> bool {
        matches!(self, PriceValue::Percentage(_))
    }

    /// Dollars for flat prices, the percentage itself for percentage prices
    pub fn amount(&self) -> f64 {
        match self {
            PriceValue::Flat(amount) | PriceValue::Percentage(amount) => *amount,
            PriceValue::Unavailable | PriceValue::Included => 0.0,
        }
    }
}

fn first_number(text: &str) -> Option<f64> {
    NUMBER
        .find(text)
        .and_then(|found| found.as_str().replace(',', "").parse::<f64>().ok())
}

/// Price of `item` under `billing_type`, falling back to the annual column, then to zero
pub fn unit_price(item: &PricingItem, billing_type: BillingType) -> PriceValue {
    let price = PriceValue::parse(item.price_for(billing_type));

    if price.is_available() {
        return price;
    }

    match PriceValue::parse(item.billed_annually.as_deref()) {
        PriceValue::Unavailable => PriceValue::Flat(0.0),
        annual => annual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_prices() {
        assert_eq!(PriceValue::parse(Some("$15")), PriceValue::Flat(15.0));
        assert_eq!(PriceValue::parse(Some("$0.10 per GB")), PriceValue::Flat(0.1));
        assert_eq!(PriceValue::parse(Some("$1,250.50")), PriceValue::Flat(1250.5));
        assert_eq!(PriceValue::parse(Some("$.05")), PriceValue::Flat(0.05));
    }

    #[test]
    fn parses_percentages() {
        assert_eq!(PriceValue::parse(Some("3%")), PriceValue::Percentage(3.0));
        assert_eq!(
            PriceValue::parse(Some("10% of total spend")),
            PriceValue::Percentage(10.0)
        );
    }

    #[test]
    fn included_and_free_are_zero() {
        assert_eq!(PriceValue::parse(Some("Included")), PriceValue::Included);
        assert_eq!(
            PriceValue::parse(Some("Included with APM")),
            PriceValue::Included
        );
        assert_eq!(PriceValue::parse(Some("FREE")), PriceValue::Included);
        assert_eq!(PriceValue::Included.amount(), 0.0);
    }

    #[test]
    fn placeholders_are_unavailable() {
        for raw in [None, Some(""), Some("  "), Some("-"), Some("—"), Some("N/A"), Some("Contact us")] {
            assert_eq!(PriceValue::parse(raw), PriceValue::Unavailable, "{raw:?}");
        }
    }

    #[test]
    fn falls_back_to_annual_then_zero() {
        let item = PricingItem::new("us1", "APM", "per host").with_prices(
            Some("$31".into()),
            None,
            Some("-".into()),
        );

        assert_eq!(unit_price(&item, BillingType::Monthly), PriceValue::Flat(31.0));
        assert_eq!(unit_price(&item, BillingType::OnDemand), PriceValue::Flat(31.0));

        let bare = PricingItem::new("us1", "Audit Trail", "per unit");
        assert_eq!(unit_price(&bare, BillingType::Annually), PriceValue::Flat(0.0));
    }

    #[test]
    fn available_mode_price_wins() {
        let item = PricingItem::new("us1", "Infrastructure Pro", "per host").with_prices(
            Some("$15".into()),
            Some("$18".into()),
            Some("$0.03".into()),
        );

        assert_eq!(unit_price(&item, BillingType::Monthly), PriceValue::Flat(18.0));
        assert_eq!(unit_price(&item, BillingType::OnDemand), PriceValue::Flat(0.03));
    }
}
