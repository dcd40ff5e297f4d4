use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BillingType {
    #[default]
    #[serde(alias = "annual")]
    #[strum(to_string = "annually", serialize = "annual")]
    Annually,
    #[serde(alias = "month_to_month")]
    #[strum(to_string = "monthly", serialize = "month_to_month")]
    Monthly,
    #[serde(alias = "ondemand")]
    #[strum(to_string = "on_demand", serialize = "ondemand")]
    OnDemand,
}

/// One amount per billing mode, used for unit prices, line totals and quote totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeAmounts {
    pub annually: f64,
    pub monthly: f64,
    pub on_demand: f64,
}

impl ModeAmounts {
    pub fn get(&self, billing_type: BillingType) -> f64 {
        match billing_type {
            BillingType::Annually => self.annually,
            BillingType::Monthly => self.monthly,
            BillingType::OnDemand => self.on_demand,
        }
    }

    pub fn get_mut(&mut self, billing_type: BillingType) -> &mut f64 {
        match billing_type {
            BillingType::Annually => &mut self.annually,
            BillingType::Monthly => &mut self.monthly,
            BillingType::OnDemand => &mut self.on_demand,
        }
    }

    pub fn rounded(&self) -> Self {
        Self {
            annually: round_cents(self.annually),
            monthly: round_cents(self.monthly),
            on_demand: round_cents(self.on_demand),
        }
    }

    /// How much cheaper annual billing is than month-to-month
    pub fn savings_vs_monthly(&self) -> f64 {
        round_cents(self.monthly - self.annually)
    }

    /// How much cheaper annual billing is than on-demand
    pub fn savings_vs_on_demand(&self) -> f64 {
        round_cents(self.on_demand - self.annually)
    }
}

pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn accepts_legacy_spellings() {
        let annual: BillingType = serde_json::from_str(r#""annual""#).unwrap();
        let monthly: BillingType = serde_json::from_str(r#""month_to_month""#).unwrap();
        let on_demand: BillingType = serde_json::from_str(r#""on_demand""#).unwrap();

        assert_eq!(annual, BillingType::Annually);
        assert_eq!(monthly, BillingType::Monthly);
        assert_eq!(on_demand, BillingType::OnDemand);
        assert_eq!(BillingType::from_str("annual").unwrap(), BillingType::Annually);
    }

    #[test]
    fn serializes_canonical_names() {
        assert_eq!(
            serde_json::to_string(&BillingType::OnDemand).unwrap(),
            r#""on_demand""#
        );
        assert_eq!(BillingType::Annually.to_string(), "annually");
    }

    #[test]
    fn iterates_three_modes() {
        assert_eq!(BillingType::iter().count(), 3);
    }

    #[test]
    fn savings_compare_against_annual() {
        let totals = ModeAmounts {
            annually: 150.0,
            monthly: 180.0,
            on_demand: 200.004,
        };

        assert_eq!(totals.savings_vs_monthly(), 30.0);
        assert_eq!(totals.savings_vs_on_demand(), 50.0);
        assert_eq!(totals.get(BillingType::Monthly), 180.0);
    }

    #[test]
    fn rounds_half_cents_up() {
        assert_eq!(round_cents(0.125), 0.13);
        assert_eq!(round_cents(19.999), 20.0);
    }
}
