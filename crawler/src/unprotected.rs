use std::{str::FromStr, time::Duration};

use reqwest::{
    ClientBuilder as BaseClientBuilder,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use reqwest_middleware::{ClientBuilder as RetryableClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use tracing::{debug, info};

use crate::{
    errors::CrawlerError,
    request::Request,
    traits::{CrawlerResponse, HttpMethod},
};

const PAGE_TIMEOUT_SECONDS: u64 = 30;
const PAGE_MIN_SECS_BACKOFF: u64 = 2;
const PAGE_MAX_SECS_BACKOFF: u64 = 30;
const MAX_RETRY: u32 = 3;

const USER_AGENT: &str = "pricehound/1.0 (+https://github.com/pricehound/pricehound)";

#[derive(Debug, Clone)]
pub struct CrawlerSettings {
    pub user_agent: String,
    pub timeout: Duration,
    pub https_only: bool,
    pub max_retries: u32,
    pub min_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for CrawlerSettings {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.into(),
            timeout: Duration::from_secs(PAGE_TIMEOUT_SECONDS),
            https_only: true,
            max_retries: MAX_RETRY,
            min_backoff: Duration::from_secs(PAGE_MIN_SECS_BACKOFF),
            max_backoff: Duration::from_secs(PAGE_MAX_SECS_BACKOFF),
        }
    }
}

/// Plain HTTP client for pages that don't sit behind bot protection
#[derive(Clone)]
pub struct UnprotectedCrawler {
    client: ClientWithMiddleware,
}

impl UnprotectedCrawler {
    pub fn new() -> Result<Self, CrawlerError> {
        Self::with_settings(CrawlerSettings::default())
    }

    pub fn with_settings(settings: CrawlerSettings) -> Result<Self, CrawlerError> {
        Ok(Self {
            client: Self::create_client(&settings)?,
        })
    }

    fn create_client(settings: &CrawlerSettings) -> Result<ClientWithMiddleware, CrawlerError> {
        let base_client = BaseClientBuilder::new()
            .gzip(true)
            .http1_ignore_invalid_headers_in_responses(true)
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .https_only(settings.https_only)
            .build()
            .map_err(|err| CrawlerError::ClientBuildFailed(err.to_string()))?;

        let retry_strat = ExponentialBackoff::builder()
            .retry_bounds(settings.min_backoff, settings.max_backoff)
            .build_with_max_retries(settings.max_retries);
        let retry_middleware = RetryTransientMiddleware::new_with_policy(retry_strat);

        Ok(RetryableClientBuilder::new(base_client)
            .with(retry_middleware)
            .build())
    }

    pub async fn make_web_request(
        &self,
        request: Request,
    ) -> Result<CrawlerResponse, CrawlerError> {
        let mut request_builder = match request.method {
            HttpMethod::GET => self.client.get(request.url.clone()),
            HttpMethod::POST => self.client.post(request.url.clone()),
        };

        if let Some(body) = request.body {
            request_builder = request_builder.body(body);
        }

        if let Some(headers) = request.headers {
            let mut header_map = HeaderMap::new();

            for (key, value) in headers.iter() {
                header_map.append(HeaderName::from_str(key)?, HeaderValue::from_str(value)?);
            }

            request_builder = request_builder.headers(header_map);
        }

        info!("Sending request to {}", request.url);

        let response = request_builder.send().await?;

        debug!("{response:?}");

        let status = response.status();

        if !status.is_success() {
            return Err(CrawlerError::UnexpectedStatus {
                url: request.url,
                status: status.as_u16(),
            });
        }

        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(CrawlerResponse {
            body,
            status,
            headers,
        })
    }
}
