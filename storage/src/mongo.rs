mod collections;
pub mod connector;
