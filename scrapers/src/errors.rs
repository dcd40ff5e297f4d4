use crawler::errors::CrawlerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Failed to fetch page: {0}")]
    CrawlerFailed(#[from] CrawlerError),
    #[error("Failed to parse number: {0}")]
    InvalidNumber(String),
    #[error("Invalid CSS selector {0}")]
    InvalidSelector(String),
    #[error("Missing element {0} from HTML")]
    HtmlMissingElement(String),
}
