use common::{
    allotments::Allotment,
    billing::{BillingType, ModeAmounts, round_cents},
    pricing::PricingItem,
    quotes::{AllotmentInfo, LineItemInput, QuoteLineItem},
};
use strum::IntoEnumIterator;
use tracing::debug;

use crate::{
    allotments::AllotmentLedger,
    lookup::find_product,
    price::{PriceValue, unit_price},
};

const UNKNOWN_BILLING_UNIT: &str = "per unit";

#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub items: Vec<QuoteLineItem>,
    pub totals: ModeAmounts,
}

/// The product a line resolved to, or what the caller sent when nothing matched
struct ResolvedLine<'a> {
    input: &'a LineItemInput,
    item: Option<&'a PricingItem>,
}

impl ResolvedLine<'_> {
    fn product_id(&self) -> Option<&str> {
        match self.item {
            Some(item) => Some(item.id.as_str()),
            None => self.input.product_id.as_deref(),
        }
    }

    fn product(&self) -> &str {
        self.item
            .map(|item| item.product.as_str())
            .unwrap_or(self.input.product.as_str())
    }

    fn billing_unit(&self) -> &str {
        self.item
            .map(|item| item.billing_unit.as_str())
            .unwrap_or(UNKNOWN_BILLING_UNIT)
    }

    fn price(&self, billing_type: BillingType) -> PriceValue {
        match self.item {
            Some(item) if !self.input.is_allotment => unit_price(item, billing_type),
            _ => PriceValue::Flat(0.0),
        }
    }
}

pub struct QuoteCalculator<'a> {
    pricing: &'a [PricingItem],
    allotments: &'a [Allotment],
}

impl<'a> QuoteCalculator<'a> {
    pub fn new(pricing: &'a [PricingItem], allotments: &'a [Allotment]) -> Self {
        Self {
            pricing,
            allotments,
        }
    }

    pub fn calculate(&self, billing_type: BillingType, inputs: &[LineItemInput]) -> Calculation {
        let lines = inputs
            .iter()
            .map(|input| {
                let item = find_product(self.pricing, input.product_id.as_deref(), &input.product);

                if item.is_none() {
                    debug!("No price found for {:?}, pricing it at zero", input.product);
                }

                ResolvedLine { input, item }
            })
            .collect::<Vec<ResolvedLine>>();

        let mut ledger = AllotmentLedger::new(self.allotments);

        // every parent earns its credit before any line draws from it
        let included_by_line = lines
            .iter()
            .map(|line| match line.input.is_allotment {
                true => Vec::new(),
                false => ledger.credit(line.product_id(), line.product(), line.input.quantity),
            })
            .collect::<Vec<Vec<AllotmentInfo>>>();

        let mut subtotal = ModeAmounts::default();
        let mut items = Vec::with_capacity(lines.len());

        for (line, allotments) in lines.iter().zip(included_by_line) {
            let quantity = line.input.quantity;

            let included_quantity = match line.input.is_allotment {
                true => quantity,
                false => ledger.draw(line.product_id(), line.product(), quantity),
            };
            let chargeable_quantity = quantity.saturating_sub(included_quantity);

            let mut unit_prices = ModeAmounts::default();
            let mut totals = ModeAmounts::default();

            for mode in BillingType::iter() {
                let price = line.price(mode);

                let total = match price {
                    PriceValue::Percentage(percentage) if quantity > 0 => {
                        subtotal.get(mode) * percentage / 100.0
                    }
                    PriceValue::Percentage(_) => 0.0,
                    _ => price.amount() * chargeable_quantity as f64,
                };

                let total = round_cents(total);

                *unit_prices.get_mut(mode) = price.amount();
                *totals.get_mut(mode) = total;
                *subtotal.get_mut(mode) += total;
            }

            items.push(QuoteLineItem {
                product_id: line.product_id().map(str::to_string),
                product: line.product().to_string(),
                billing_unit: line.billing_unit().to_string(),
                quantity,
                included_quantity,
                chargeable_quantity,
                unit_price: unit_prices.get(billing_type),
                total_price: totals.get(billing_type),
                unit_price_annually: unit_prices.annually,
                unit_price_monthly: unit_prices.monthly,
                unit_price_on_demand: unit_prices.on_demand,
                total_price_annually: totals.annually,
                total_price_monthly: totals.monthly,
                total_price_on_demand: totals.on_demand,
                is_percentage: line.price(billing_type).is_percentage(),
                is_allotment: line.input.is_allotment,
                allotments,
            });
        }

        Calculation {
            items,
            totals: subtotal.rounded(),
        }
    }
}
