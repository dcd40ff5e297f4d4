use crawler::request::Request;

use crate::errors::ScraperError;

/// A single vendor page that turns into a list of rows
pub trait PageScraper: Send + Sync {
    type Output: Send;

    fn scraper_name(&self) -> &'static str;

    fn build_page_request(&self) -> Request;

    fn parse_response(&self, response: &str) -> Result<Vec<Self::Output>, ScraperError>;
}
