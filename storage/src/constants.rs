pub(crate) const PRICING_DIR: &str = "pricing";
pub(crate) const QUOTES_DIR: &str = "quotes";
pub(crate) const ALLOTMENTS_FILE: &str = "allotments.json";
pub(crate) const ALLOTMENTS_METADATA_FILE: &str = "allotments_metadata.json";
pub(crate) const TEMPLATE_FILE_PREFIX: &str = "template-";

pub(crate) const DATABASE_NAME: &str = "pricehound";

pub(crate) const COLLECTION_PRICING_NAME: &str = "pricing";
pub(crate) const COLLECTION_ALLOTMENTS_NAME: &str = "allotments";
pub(crate) const COLLECTION_QUOTES_NAME: &str = "quotes";
