use std::collections::HashMap;

use common::{
    allotments::Allotment,
    quotes::{AllotmentInfo, MAX_QUANTITY},
};
use tracing::trace;

/// Tracks how many units of each allotted product are still free to use.
///
/// Parent lines credit `quantity_per_parent * quantity` to every product they
/// allot, lines for an allotted product then draw from that credit in order.
pub struct AllotmentLedger<'a> {
    rules: &'a [Allotment],
    // keyed on the lowercased allotted product name
    credits: HashMap<String, u64>,
}

impl<'a> AllotmentLedger<'a> {
    pub fn new(rules: &'a [Allotment]) -> Self {
        Self {
            rules,
            credits: HashMap::new(),
        }
    }

    fn key(product: &str) -> String {
        product.trim().to_lowercase()
    }

    /// Credits every rule whose parent is this product, returning what the line includes
    pub fn credit(
        &mut self,
        product_id: Option<&str>,
        product: &str,
        quantity: u64,
    ) -> Vec<AllotmentInfo> {
        let mut included = Vec::new();

        for rule in self.rules.iter().filter(|rule| rule.is_parent(product_id, product)) {
            let amount = rule
                .quantity_per_parent
                .saturating_mul(quantity)
                .min(MAX_QUANTITY);
            let credit = self
                .credits
                .entry(Self::key(&rule.allotted_product))
                .or_default();

            *credit = credit.saturating_add(amount).min(MAX_QUANTITY);

            trace!(
                "{} x{} includes {} {}",
                product, quantity, amount, rule.allotted_product
            );

            included.push(AllotmentInfo {
                allotted_product: rule.allotted_product.clone(),
                quantity_included: amount,
                allotted_unit: rule.allotted_unit.clone(),
            });
        }

        included
    }

    /// Takes up to `quantity` units of free credit for this product, returning how many were covered
    pub fn draw(&mut self, product_id: Option<&str>, product: &str, quantity: u64) -> u64 {
        let mut keys: Vec<String> = Vec::new();

        for rule in self.rules.iter().filter(|rule| rule.is_allotted(product_id, product)) {
            let key = Self::key(&rule.allotted_product);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        let mut needed = quantity;

        for key in keys {
            if needed == 0 {
                break;
            }

            if let Some(credit) = self.credits.get_mut(&key) {
                let taken = needed.min(*credit);
                *credit -= taken;
                needed -= taken;
            }
        }

        quantity - needed
    }

    #[cfg(test)]
    fn remaining(&self, product: &str) -> u64 {
        self.credits.get(&Self::key(product)).copied().unwrap_or_default()
    }
}
