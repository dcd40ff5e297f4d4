use crawler::unprotected::UnprotectedCrawler;
use tracing::{debug, info, trace};

use crate::{errors::ScraperError, traits::PageScraper};

pub struct ScrapeClient {
    crawler: UnprotectedCrawler,
}

impl ScrapeClient {
    pub fn new(crawler: UnprotectedCrawler) -> Self {
        Self { crawler }
    }

    pub async fn scrape<S: PageScraper>(&self, scraper: &S) -> Result<Vec<S::Output>, ScraperError> {
        let request = scraper.build_page_request();

        debug!("{} requesting {}", scraper.scraper_name(), request.url());

        let response = self.crawler.make_web_request(request).await?;
        trace!("{}", response.body);

        let results = scraper.parse_response(&response.body)?;

        info!("{} parsed {} rows", scraper.scraper_name(), results.len());

        Ok(results)
    }
}
