use crate::traits::HttpMethod;

#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) method: HttpMethod,
    pub(crate) url: String,
    pub(crate) body: Option<String>,
    pub(crate) headers: Option<Vec<(String, String)>>,
}

pub struct RequestBuilder {
    request: Request,
}

impl Request {
    pub fn builder() -> RequestBuilder {
        RequestBuilder::new()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }
}

impl Default for Request {
    fn default() -> Self {
        Request {
            method: HttpMethod::GET,
            url: Default::default(),
            body: None,
            headers: None,
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            request: Request::default(),
        }
    }

    pub fn set_method(mut self, method: HttpMethod) -> Self {
        self.request.method = method;

        self
    }

    pub fn set_url(mut self, url: impl Into<String>) -> Self {
        self.request.url = url.into();

        self
    }

    pub fn set_body(mut self, body: String) -> Self {
        self.request.body = Some(body);

        self
    }

    pub fn set_headers(mut self, headers: &[(String, String)]) -> Self {
        self.request.headers = Some(headers.to_vec());

        self
    }

    pub fn build(self) -> Request {
        self.request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_to_get() {
        let request = RequestBuilder::new()
            .set_url("https://www.datadoghq.com/pricing/list/")
            .build();

        assert_eq!(request.method(), HttpMethod::GET);
        assert_eq!(request.url(), "https://www.datadoghq.com/pricing/list/");
        assert!(request.headers.is_none());
    }

    #[test]
    fn builder_keeps_headers_and_body() {
        let request = Request::builder()
            .set_method(HttpMethod::POST)
            .set_url("https://example.com")
            .set_headers(&[("Accept".into(), "text/html".into())])
            .set_body("payload".into())
            .build();

        assert_eq!(request.method, HttpMethod::POST);
        assert_eq!(request.body.as_deref(), Some("payload"));
        assert_eq!(request.headers.unwrap().len(), 1);
    }
}
