pub mod allotments;
pub mod billing;
pub mod deserialize_disallow_empty_string;
pub mod pricing;
pub mod quotes;
pub mod regions;
pub mod templates;
pub mod utils;
