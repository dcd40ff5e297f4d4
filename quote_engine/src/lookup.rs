use common::{pricing::PricingItem, utils::names_match};

/// Id first, then exact name, then a name containing (or contained in) the other
pub fn find_product<'a>(
    pricing: &'a [PricingItem],
    product_id: Option<&str>,
    name: &str,
) -> Option<&'a PricingItem> {
    if let Some(product_id) = product_id.filter(|id| !id.is_empty())
        && let Some(item) = pricing.iter().find(|item| item.id == product_id)
    {
        return Some(item);
    }

    let name = name.trim().to_lowercase();

    if name.is_empty() {
        return None;
    }

    if let Some(item) = pricing.iter().find(|item| names_match(&item.product, &name)) {
        return Some(item);
    }

    pricing.iter().find(|item| {
        let product = item.product.trim().to_lowercase();
        !product.is_empty() && (product.contains(&name) || name.contains(&product))
    })
}

/// Exact (case-insensitive) name only, a near miss would hand a rule another product's id
pub fn find_product_id_by_name(pricing: &[PricingItem], name: &str) -> Option<String> {
    pricing
        .iter()
        .find(|item| !name.trim().is_empty() && names_match(&item.product, name))
        .map(|item| item.id.clone())
}
