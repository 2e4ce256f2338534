pub mod http_fetcher;
pub mod parallel;

use async_trait::async_trait;
use url::Url;

use crate::app::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// One outbound HTTP exchange.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub method: Method,
    pub url: Url,
    pub bearer_token: Option<String>,
    pub accept: Option<&'static str>,
    pub json_body: Option<serde_json::Value>,
}

impl FetchRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            bearer_token: None,
            accept: None,
            json_body: None,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn with_bearer(mut self, token: &str) -> Self {
        self.bearer_token = Some(token.to_string());
        self
    }

    pub fn with_accept(mut self, accept: &'static str) -> Self {
        self.accept = Some(accept);
        self
    }

    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.json_body = Some(body);
        self
    }
}

#[async_trait]
pub trait Fetcher {
    /// Send the request and return the response body. Non-2xx statuses are
    /// errors.
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>>;
}
