pub mod allotments_page;
pub mod errors;
pub mod manual_allotments;
pub mod pricing_page;
pub mod scrape_client;
pub mod traits;
pub(crate) mod utils;

pub use allotments_page::{AllotmentValue, AllotmentsPageScraper, parse_allotment_value};
pub use pricing_page::PricingPageScraper;
pub use scrape_client::ScrapeClient;
