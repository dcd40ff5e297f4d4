pub mod allotments;
pub mod calculator;
pub mod lookup;
pub mod price;

pub use allotments::AllotmentLedger;
pub use calculator::{Calculation, QuoteCalculator};
pub use lookup::{find_product, find_product_id_by_name};
pub use price::{PriceValue, unit_price};
