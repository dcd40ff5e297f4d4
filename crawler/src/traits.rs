use reqwest::{StatusCode, header::HeaderMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    GET,
    POST,
}

#[derive(Debug)]
pub struct CrawlerResponse {
    pub body: String,
    pub status: StatusCode,
    pub headers: HeaderMap,
}
