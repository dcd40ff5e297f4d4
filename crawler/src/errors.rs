use reqwest::header::{InvalidHeaderName, InvalidHeaderValue};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlerError {
    #[error("Crawler request failed after retries: {0}")]
    ClientMiddlewareError(#[from] reqwest_middleware::Error),
    #[error("Crawler request failed: {0}")]
    ClientError(#[from] reqwest::Error),
    #[error("Crawler failed to build client: {0}")]
    ClientBuildFailed(String),
    #[error("Crawler failed to create header")]
    InvalidHeader,
    #[error("{url} responded with status {status}")]
    UnexpectedStatus { url: String, status: u16 },
}

impl From<InvalidHeaderName> for CrawlerError {
    fn from(_err: InvalidHeaderName) -> Self {
        Self::InvalidHeader
    }
}

impl From<InvalidHeaderValue> for CrawlerError {
    fn from(_err: InvalidHeaderValue) -> Self {
        Self::InvalidHeader
    }
}
