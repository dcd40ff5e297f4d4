pub(crate) mod allotments;
pub(crate) mod pricing;
pub(crate) mod quotes;
