use tracing::error;

use crate::errors::ScraperError;

/// Is capable of parsing the following into a whole quantity:
/// 1. "100"
/// 2. "1,000,000"
/// 3. "1.5" (rounded)
pub(crate) fn quantity_to_u64(quantity: &str) -> Result<u64, ScraperError> {
    let cleaned = quantity.trim().replace(',', "");

    let Ok(parsed) = cleaned.parse::<f64>() else {
        error!("Failed to parse quantity {}", quantity);
        return Err(ScraperError::InvalidNumber(quantity.into()));
    };

    if !parsed.is_finite() || parsed < 0.0 {
        error!("Quantity out of range {}", quantity);
        return Err(ScraperError::InvalidNumber(quantity.into()));
    }

    Ok(parsed.round() as u64)
}
