use crawler::errors::CrawlerError;
use storage::errors::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    #[error("Quote {0} not found")]
    QuoteNotFound(String),

    #[error("Invalid edit password")]
    InvalidPassword,

    #[error("Quantity {0} is too large")]
    QuantityTooLarge(u64),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures while wiring the server together at startup
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Crawler(#[from] CrawlerError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("Server stopped: {0}")]
    Serve(std::io::Error),
}
